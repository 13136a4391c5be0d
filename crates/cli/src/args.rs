//! Command-line arguments.

use clap::{Args, Parser, Subcommand};

/// Purge full-page cache entries from the key-value store.
#[derive(Debug, Parser)]
#[command(name = "page-purge", version, about = "Purge full-page cache entries")]
pub struct CliArgs {
    /// Record and print purge requests instead of sending them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Purge one or more page URLs. A trailing `*` purges everything below it.
    Urls(UrlsArgs),
    /// Purge raw cache keys, bypassing URL derivation.
    Keys(KeysArgs),
    /// Purge every cached page of a site.
    All(AllArgs),
}

#[derive(Debug, Args, Clone)]
pub struct UrlsArgs {
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct KeysArgs {
    #[arg(required = true, value_name = "KEY")]
    pub keys: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct AllArgs {
    /// Site root; falls back to the configured site URL.
    #[arg(long, env = "PAGE_PURGE_SITE_URL", value_name = "URL")]
    pub site_url: Option<String>,
}
