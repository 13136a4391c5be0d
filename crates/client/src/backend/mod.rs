//! Key-value store backends.
//!
//! ### Contract
//! - `delete_key` removes one exact key and returns 0 or 1.
//! - `delete_pattern` removes every key matching a store-side glob in one
//!   atomic Lua script and returns the count. 0 means nothing matched.
//! - Failures never reach the caller: they are logged (when enabled) and
//!   reported as 0 deleted.
//!
//! ### Variants
//! - [`NativeBackend`] (feature `native`): `redis::Script` with a 5 second
//!   connect timeout; a failed connect disables it for the process lifetime.
//! - [`RawBackend`]: raw `DEL`/`EVAL` commands; connects eagerly and retries
//!   the connect on the next purge if the first attempt failed. Every attempt
//!   is bounded by the same connect timeout.
//! - [`DryRunBackend`]: records requests without touching a store.
//!
//! Exactly one variant is selected per process via [`BackendKind`] and
//! shared through [`connect`].

pub mod dry_run;
#[cfg(feature = "native")]
pub mod native;
pub mod raw;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pagepurge_core::{AppConfig, BackendChoice, Error, PurgeLog};
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

pub use dry_run::DryRunBackend;
#[cfg(feature = "native")]
pub use native::NativeBackend;
pub use raw::RawBackend;

/// Upper bound on a single connect attempt, for every backend variant.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Server-side scan-and-delete. `KEYS[1]` is the glob pattern.
pub(crate) const DELETE_BY_PATTERN: &str = r"local deleted = 0
for _, name in ipairs(redis.call('KEYS', KEYS[1])) do
    redis.call('DEL', name)
    deleted = deleted + 1
end
return deleted";

/// Capability contract shared by every backend variant.
pub trait PurgeBackend: Send + Sync {
    /// Delete a single exact key.
    fn delete_key(&self, key: &str) -> u64;

    /// Delete every key matching `pattern` using store-native glob matching.
    fn delete_pattern(&self, pattern: &str) -> u64;

    /// Whether the backend currently holds a usable connection.
    fn is_connected(&self) -> bool;

    /// Backend name for debugging/logging.
    fn backend_name(&self) -> &'static str;
}

/// Store endpoint, resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetails {
    pub host: String,
    pub port: u16,
}

impl ConnectionDetails {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub(crate) fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo::default(),
        }
    }
}

impl From<&AppConfig> for ConnectionDetails {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.host.clone(), config.port)
    }
}

impl fmt::Display for ConnectionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Backend variant selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Native,
    Raw,
}

impl BackendKind {
    /// The best variant compiled into this build.
    pub fn detect() -> Self {
        if cfg!(feature = "native") { BackendKind::Native } else { BackendKind::Raw }
    }

    /// Resolve a configured choice against what this build supports.
    pub fn resolve(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Auto => Self::detect(),
            BackendChoice::Raw => BackendKind::Raw,
            BackendChoice::Native if cfg!(feature = "native") => BackendKind::Native,
            BackendChoice::Native => {
                tracing::warn!("native backend requested but not compiled in; falling back to raw");
                BackendKind::Raw
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Raw => "raw",
        }
    }
}

/// Construct and connect the backend for `kind`.
pub fn connect(kind: BackendKind, details: &ConnectionDetails, log: PurgeLog) -> Arc<dyn PurgeBackend> {
    tracing::info!(backend = kind.name(), address = %details, "Connecting purge backend");
    match kind {
        #[cfg(feature = "native")]
        BackendKind::Native => Arc::new(NativeBackend::connect(details, log)),
        #[cfg(not(feature = "native"))]
        BackendKind::Native => Arc::new(RawBackend::connect(details, log)),
        BackendKind::Raw => Arc::new(RawBackend::connect(details, log)),
    }
}

/// Turn a command outcome into the best-effort count.
pub(crate) fn settle(
    outcome: Result<u64, Error>, log: PurgeLog, backend: &'static str, op: &'static str, target: &str,
) -> u64 {
    match outcome {
        Ok(deleted) => {
            if log.enabled() {
                tracing::debug!(backend, op, target, deleted, "Purge command completed");
            }
            deleted
        }
        Err(e) => {
            if log.enabled() {
                tracing::warn!(backend, op, target, code = e.code(), error = %e, "Purge command failed");
            }
            0
        }
    }
}

pub(crate) fn connection_error(err: &redis::RedisError) -> Error {
    Error::Connection(err.to_string())
}

pub(crate) fn transport_error(err: &redis::RedisError) -> Error {
    Error::Transport(err.to_string())
}

#[cfg(test)]
pub(crate) fn refused_details() -> ConnectionDetails {
    // Port 1 (tcpmux) is never served in test environments; connects are refused immediately.
    ConnectionDetails::new("127.0.0.1", 1)
}

/// A local listener that never accepts, with its backlog full so further
/// connects stall in the TCP handshake. Keep the held streams alive for the
/// duration of the test.
#[cfg(test)]
pub(crate) fn unresponsive_details() -> (std::net::TcpListener, Vec<std::net::TcpStream>, ConnectionDetails) {
    use std::net::{TcpListener, TcpStream};

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut held = Vec::new();
    for _ in 0..4096 {
        match TcpStream::connect_timeout(&addr, Duration::from_millis(200)) {
            Ok(stream) => held.push(stream),
            Err(_) => break,
        }
    }
    (listener, held, ConnectionDetails::new("127.0.0.1", addr.port()))
}
