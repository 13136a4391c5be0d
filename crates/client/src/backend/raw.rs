//! Raw-command backend.
//!
//! Sends `DEL` and `EVAL` directly. The connection is opened at construction;
//! when that fails, or the server drops the connection, the next purge tries
//! to connect again before giving up for that call. Each attempt is bounded
//! by [`CONNECT_TIMEOUT`].

use std::sync::Mutex;

use pagepurge_core::{Error, PurgeLog};
use redis::{Client, Connection, RedisResult};

use super::{CONNECT_TIMEOUT, ConnectionDetails, DELETE_BY_PATTERN, PurgeBackend, connection_error, settle, transport_error};
use crate::lock::mutex_lock;

const NAME: &str = "raw";
const SOURCE: &str = "backend::raw";

/// Backend issuing raw commands over a single connection.
pub struct RawBackend {
    client: Option<Client>,
    conn: Mutex<Option<Connection>>,
    log: PurgeLog,
}

impl RawBackend {
    /// Create the client and connect eagerly. Errors are logged, not returned.
    pub fn connect(details: &ConnectionDetails, log: PurgeLog) -> Self {
        let client = match Client::open(details.connection_info()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!(backend = NAME, address = %details, error = %e, "Invalid cache store address");
                None
            }
        };

        let conn = match client.as_ref().map(|client| client.get_connection_with_timeout(CONNECT_TIMEOUT)) {
            Some(Ok(conn)) => Some(conn),
            Some(Err(e)) => {
                tracing::error!(backend = NAME, address = %details, error = %e, "Cache store unreachable");
                None
            }
            None => None,
        };

        Self { client, conn: Mutex::new(conn), log }
    }

    fn with_connection<T>(
        &self, op: &'static str, command: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> Result<T, Error> {
        let mut guard = mutex_lock(&self.conn, SOURCE, op);
        if guard.is_none() {
            let client = self.client.as_ref().ok_or(Error::Unavailable(NAME))?;
            let conn = client.get_connection_with_timeout(CONNECT_TIMEOUT).map_err(|e| connection_error(&e))?;
            *guard = Some(conn);
        }
        let Some(conn) = guard.as_mut() else {
            return Err(Error::Unavailable(NAME));
        };

        command(conn).map_err(|e| {
            if e.is_connection_dropped() {
                *guard = None;
            }
            transport_error(&e)
        })
    }
}

impl PurgeBackend for RawBackend {
    fn delete_key(&self, key: &str) -> u64 {
        let outcome = self.with_connection("delete_key", |conn| redis::cmd("DEL").arg(key).query(conn));
        settle(outcome, self.log, NAME, "delete_key", key)
    }

    fn delete_pattern(&self, pattern: &str) -> u64 {
        let outcome = self.with_connection("delete_pattern", |conn| {
            redis::cmd("EVAL").arg(DELETE_BY_PATTERN).arg(1).arg(pattern).query(conn)
        });
        settle(outcome, self.log, NAME, "delete_pattern", pattern)
    }

    fn is_connected(&self) -> bool {
        mutex_lock(&self.conn, SOURCE, "is_connected").is_some()
    }

    fn backend_name(&self) -> &'static str {
        NAME
    }
}
