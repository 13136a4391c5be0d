//! URL-set overrides for each event.

use pagepurge_core::Filter;

use crate::model::{Comment, Post, Taxonomy, TermId, UserId};

/// Context handed to the term filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermContext {
    pub term_id: TermId,
    pub taxonomy: Taxonomy,
}

/// Filters applied to each handler's URL set before it is dispatched.
///
/// All slots default to pass-through.
#[derive(Debug, Default)]
pub struct EventHooks {
    /// Receives the post as used for URL computation (already republished if it was a draft).
    pub post: Filter<Vec<String>, Post>,
    pub comment: Filter<Vec<String>, Comment>,
    pub terms: Filter<Vec<String>, TermContext>,
    pub user: Filter<Vec<String>, UserId>,
}
