//! Scripted backend with a bounded connect.
//!
//! Connects once with a fixed timeout. If that fails the backend stays dead
//! for the rest of the process: no retry, no reconnect loop. Every purge on a
//! dead backend is logged and reports 0.

use std::sync::Mutex;

use pagepurge_core::{Error, PurgeLog};
use redis::{Client, Connection, RedisResult, Script};

use super::{CONNECT_TIMEOUT, ConnectionDetails, DELETE_BY_PATTERN, PurgeBackend, connection_error, settle, transport_error};
use crate::lock::mutex_lock;

const NAME: &str = "native";
const SOURCE: &str = "backend::native";

/// Backend built on `redis::Script`, which sends `EVALSHA` and falls back to
/// `EVAL` when the script is not yet cached on the server.
pub struct NativeBackend {
    conn: Option<Mutex<Connection>>,
    script: Script,
    log: PurgeLog,
}

impl NativeBackend {
    /// Connect to the store. Never fails: a connect error is logged and leaves
    /// the backend permanently unusable.
    pub fn connect(details: &ConnectionDetails, log: PurgeLog) -> Self {
        let conn = match open(details) {
            Ok(conn) => Some(Mutex::new(conn)),
            Err(e) => {
                tracing::error!(
                    backend = NAME,
                    address = %details,
                    error = %e,
                    "Cache store unreachable; purges are disabled for this process"
                );
                None
            }
        };

        Self { conn, script: Script::new(DELETE_BY_PATTERN), log }
    }

    fn with_connection<T>(
        &self, op: &'static str, command: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> Result<T, Error> {
        let Some(conn) = &self.conn else {
            return Err(Error::Unavailable(NAME));
        };
        let mut guard = mutex_lock(conn, SOURCE, op);
        command(&mut *guard).map_err(|e| transport_error(&e))
    }
}

fn open(details: &ConnectionDetails) -> Result<Connection, Error> {
    let client = Client::open(details.connection_info()).map_err(|e| connection_error(&e))?;
    client.get_connection_with_timeout(CONNECT_TIMEOUT).map_err(|e| connection_error(&e))
}

impl PurgeBackend for NativeBackend {
    fn delete_key(&self, key: &str) -> u64 {
        let outcome = self.with_connection("delete_key", |conn| redis::cmd("DEL").arg(key).query(conn));
        settle(outcome, self.log, NAME, "delete_key", key)
    }

    fn delete_pattern(&self, pattern: &str) -> u64 {
        let outcome = self.with_connection("delete_pattern", |conn| self.script.key(pattern).invoke(conn));
        settle(outcome, self.log, NAME, "delete_pattern", pattern)
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn backend_name(&self) -> &'static str {
        NAME
    }
}
