//! Store clients and purge dispatch for page-purge.
//!
//! This crate provides the key-value backends that delete cache entries and
//! the dispatcher that turns URLs into classified purge requests. It is
//! shared by the event mapper and the CLI.

pub mod backend;
pub mod dispatch;
mod lock;

pub use backend::{BackendKind, ConnectionDetails, DryRunBackend, PurgeBackend, RawBackend, connect};
#[cfg(feature = "native")]
pub use backend::NativeBackend;
pub use dispatch::Purger;
