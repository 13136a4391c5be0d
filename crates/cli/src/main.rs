//! page-purge entry point.
//!
//! Loads configuration, connects the configured backend and runs one purge
//! command. Logs go to stderr as JSON; dry-run output goes to stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pagepurge_client::{BackendKind, ConnectionDetails, DryRunBackend, PurgeBackend, Purger, connect};
use pagepurge_core::{AppConfig, CacheKeyCodec};
use tracing_subscriber::EnvFilter;

mod args;

use args::{CliArgs, Command};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config);
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    let log = config.purge_log();
    let dry_run = args.dry_run.then(|| Arc::new(DryRunBackend::new(log)));
    let backend: Arc<dyn PurgeBackend> = match &dry_run {
        Some(recorder) => recorder.clone(),
        None => {
            let kind = BackendKind::resolve(config.backend);
            connect(kind, &ConnectionDetails::from(&config), log)
        }
    };
    tracing::info!(backend = backend.backend_name(), connected = backend.is_connected(), "Purge backend ready");

    let purger = Purger::new(CacheKeyCodec::new(config.prefix.clone()), backend, log);

    match args.command {
        Command::Urls(urls) => purger.purge(&urls.urls),
        Command::Keys(keys) => purger.purge_keys(keys.keys),
        Command::All(all) => {
            let site_url = match all.site_url {
                Some(site_url) => site_url,
                None => config.require_site_url()?.to_string(),
            };
            purger.purge_all(&site_url);
        }
    }

    if let Some(recorder) = dry_run {
        for request in recorder.requests() {
            println!("{} {}", request.signal(), request.key());
        }
    }

    Ok(())
}

/// JSON logs on stderr. `RUST_LOG` wins; otherwise the `logging` switch picks the level.
fn init_tracing(config: &AppConfig) {
    let default_level = if config.logging { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).json().init();
}
