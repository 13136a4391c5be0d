//! Unified error types for page-purge.
//!
//! None of these reach the content-management caller: backends and the
//! event mapper catch them at the point of failure, log, and move on.

use crate::url::UrlError;

/// Unified error types for the purge pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Could not open a connection to the key-value store.
    #[error("CONNECTION_FAILED: {0}")]
    Connection(String),

    /// A delete command failed after the connection was established.
    #[error("TRANSPORT_FAILED: {0}")]
    Transport(String),

    /// The backend has no usable connection.
    #[error("BACKEND_UNAVAILABLE: {0}")]
    Unavailable(&'static str),

    /// A URL in a purge batch failed validation.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(#[from] UrlError),

    /// The taxonomy is unknown or not publicly queryable.
    #[error("MISSING_TAXONOMY: {0}")]
    MissingTaxonomy(String),
}

impl Error {
    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Connection(_) => "CONNECTION_FAILED",
            Error::Transport(_) => "TRANSPORT_FAILED",
            Error::Unavailable(_) => "BACKEND_UNAVAILABLE",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::MissingTaxonomy(_) => "MISSING_TAXONOMY",
        }
    }
}
