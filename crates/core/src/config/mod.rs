//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PAGE_PURGE_*)
//! 2. TOML config file (if PAGE_PURGE_CONFIG_FILE set)
//! 3. Built-in defaults

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::key::DEFAULT_PREFIX;
use crate::log::PurgeLog;

mod validation;

pub use validation::ConfigError;

/// Which key-value backend variant to run with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Use the best variant this build supports.
    #[default]
    Auto,
    /// Scripted client with connect timeout.
    Native,
    /// Raw-command client.
    Raw,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PAGE_PURGE_*)
/// 2. TOML config file (if PAGE_PURGE_CONFIG_FILE set)
/// 3. Built-in defaults
///
/// Values are read once at startup and treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Key-value store host.
    ///
    /// Set via PAGE_PURGE_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Key-value store port.
    ///
    /// Set via PAGE_PURGE_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix prepended to every cache key.
    ///
    /// Set via PAGE_PURGE_PREFIX environment variable.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Whether purge-path logging is enabled.
    ///
    /// Set via PAGE_PURGE_LOGGING environment variable.
    #[serde(default)]
    pub logging: bool,

    /// Backend variant override.
    ///
    /// Set via PAGE_PURGE_BACKEND environment variable (`auto`, `native`, `raw`).
    #[serde(default)]
    pub backend: BackendChoice,

    /// Public site root, used by purge-all when the caller does not supply one.
    ///
    /// Set via PAGE_PURGE_SITE_URL environment variable.
    #[serde(default)]
    pub site_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    6379
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefix: default_prefix(),
            logging: false,
            backend: BackendChoice::Auto,
            site_url: None,
        }
    }
}

impl AppConfig {
    /// Logging switch derived from `logging`.
    pub fn purge_log(&self) -> PurgeLog {
        PurgeLog::new(self.logging)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PAGE_PURGE_`
    /// 2. TOML file from `PAGE_PURGE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PAGE_PURGE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PAGE_PURGE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Site root for purge-all.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no site URL is configured.
    pub fn require_site_url(&self) -> Result<&str, ConfigError> {
        self.site_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "site_url".into(),
            hint: "Set PAGE_PURGE_SITE_URL environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6379);
        assert_eq!(config.prefix, "nginx-cache:");
        assert!(!config.logging);
        assert_eq!(config.backend, BackendChoice::Auto);
        assert!(config.site_url.is_none());
        assert!(!config.purge_log().enabled());
    }

    #[test]
    fn test_require_site_url_missing() {
        let config = AppConfig::default();
        let result = config.require_site_url();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_site_url_present() {
        let config = AppConfig { site_url: Some("https://example.com/".into()), ..Default::default() };
        assert_eq!(config.require_site_url().unwrap(), "https://example.com/");
    }

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 6379);
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("PAGE_PURGE_HOST", "redis.internal");
            jail.set_env("PAGE_PURGE_PORT", "6380");
            jail.set_env("PAGE_PURGE_PREFIX", "site-a:");
            jail.set_env("PAGE_PURGE_LOGGING", "true");
            jail.set_env("PAGE_PURGE_BACKEND", "raw");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.host, "redis.internal");
            assert_eq!(config.port, 6380);
            assert_eq!(config.prefix, "site-a:");
            assert!(config.logging);
            assert_eq!(config.backend, BackendChoice::Raw);
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file_below_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "page-purge.toml",
                r#"
                host = "10.0.0.5"
                prefix = "from-file:"
                site_url = "https://example.com/"
                "#,
            )?;
            jail.set_env("PAGE_PURGE_CONFIG_FILE", "page-purge.toml");
            jail.set_env("PAGE_PURGE_PREFIX", "from-env:");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.host, "10.0.0.5");
            assert_eq!(config.prefix, "from-env:");
            assert_eq!(config.site_url.as_deref(), Some("https://example.com/"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("PAGE_PURGE_PREFIX", "cache:*");
            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "prefix"));
            Ok(())
        });
    }
}
