//! Core types and shared functionality for page-purge.
//!
//! This crate provides:
//! - Cache key derivation with prefix and key filter hooks
//! - URL validation for purge batches
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod hooks;
pub mod key;
pub mod log;
pub mod url;

pub use config::{AppConfig, BackendChoice, ConfigError};
pub use error::Error;
pub use hooks::Filter;
pub use key::{CacheKey, CacheKeyCodec, KeyContext, PurgeRequest, WILDCARD, derive_key};
pub use log::PurgeLog;
pub use crate::url::{PurgeUrl, UrlError, validate};
