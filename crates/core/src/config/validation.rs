//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::key::WILDCARD;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `host` is empty
    /// - `port` is 0
    /// - `prefix` contains the wildcard sentinel
    /// - `site_url` is set but is not a valid purge URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "host".into(), reason: "must not be empty".into() });
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "port".into(), reason: "must be greater than 0".into() });
        }

        if self.prefix.contains(WILDCARD) {
            return Err(ConfigError::Invalid {
                field: "prefix".into(),
                reason: format!("must not contain `{WILDCARD}`, every key would become a pattern"),
            });
        }

        if let Some(site_url) = &self.site_url
            && let Err(e) = crate::url::validate(site_url)
        {
            return Err(ConfigError::Invalid { field: "site_url".into(), reason: e.to_string() });
        }

        Ok(())
    }

    /// Non-fatal findings about a valid configuration, for the caller to log
    /// once its subscriber is installed.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.prefix.is_empty() {
            warnings.push("prefix is empty; cache keys will start directly with the scheme");
        }
        warnings
    }
}
