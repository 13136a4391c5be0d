//! Content events to purge URL sets.
//!
//! This crate maps content-management events (post saved or deleted, term
//! edited, comment moderated, user deleted) onto the URLs whose cached pages
//! are now stale, and hands them to the dispatcher.

mod draft;
pub mod hooks;
pub mod mapper;
pub mod model;
pub mod site;

pub use hooks::{EventHooks, TermContext};
pub use mapper::EventMapper;
pub use model::{Comment, CommentId, Post, PostId, PostStatus, Taxonomy, Term, TermId, UserId};
pub use site::ContentSite;
