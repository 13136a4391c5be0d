//! The content-management system, as seen by the event mapper.

use crate::model::{Post, PostId, Taxonomy, Term, TermId, UserId};

/// Read access to content and its public URLs.
///
/// Implemented by the host application. Every URL returned must be absolute;
/// `None` means the object has no public URL.
pub trait ContentSite {
    /// Look up a post by id.
    fn post(&self, id: PostId) -> Option<Post>;

    /// Public URL of a post, computed from its current fields.
    fn permalink(&self, post: &Post) -> Option<String>;

    /// Archive listing for a post type, if the type has one.
    fn post_type_archive_link(&self, post_type: &str) -> Option<String>;

    /// Site root URL.
    fn site_url(&self) -> String;

    /// Look up a taxonomy by slug.
    fn taxonomy(&self, slug: &str) -> Option<Taxonomy>;

    /// All taxonomies with public archives.
    fn public_taxonomies(&self) -> Vec<Taxonomy>;

    /// Terms attached to a post, restricted to `taxonomies`.
    fn object_terms(&self, post_id: PostId, taxonomies: &[Taxonomy]) -> Vec<Term>;

    /// Archive listing for a term.
    fn term_link(&self, term_id: TermId, taxonomy: &str) -> Option<String>;

    /// Every published post carrying the term, without pagination limits.
    fn published_posts_with_term(&self, term_id: TermId, taxonomy: &str) -> Vec<Post>;

    /// Author archive listing.
    fn author_posts_url(&self, user_id: UserId) -> Option<String>;
}
