//! Backend that records purge requests instead of sending them.

use std::sync::Mutex;

use pagepurge_core::{CacheKey, PurgeLog, PurgeRequest};

use super::PurgeBackend;
use crate::lock::mutex_lock;

const NAME: &str = "dry-run";
const SOURCE: &str = "backend::dry_run";

/// Records every request in arrival order and deletes nothing.
#[derive(Debug, Default)]
pub struct DryRunBackend {
    requests: Mutex<Vec<PurgeRequest>>,
    log: PurgeLog,
}

impl DryRunBackend {
    pub fn new(log: PurgeLog) -> Self {
        Self { requests: Mutex::new(Vec::new()), log }
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<PurgeRequest> {
        mutex_lock(&self.requests, SOURCE, "requests").clone()
    }

    /// Keys received on the single-key signal.
    pub fn exact_keys(&self) -> Vec<String> {
        self.collect(|request| matches!(request, PurgeRequest::Single(_)))
    }

    /// Patterns received on the wildcard signal.
    pub fn patterns(&self) -> Vec<String> {
        self.collect(|request| matches!(request, PurgeRequest::Wildcard(_)))
    }

    pub fn clear(&self) {
        mutex_lock(&self.requests, SOURCE, "clear").clear();
    }

    fn collect(&self, keep: impl Fn(&PurgeRequest) -> bool) -> Vec<String> {
        mutex_lock(&self.requests, SOURCE, "collect")
            .iter()
            .filter(|request| keep(request))
            .map(|request| request.key().to_string())
            .collect()
    }

    fn record(&self, request: PurgeRequest) {
        if self.log.enabled() {
            tracing::info!(backend = NAME, signal = request.signal(), key = %request.key(), "Dry run: purge skipped");
        }
        mutex_lock(&self.requests, SOURCE, "record").push(request);
    }
}

impl PurgeBackend for DryRunBackend {
    fn delete_key(&self, key: &str) -> u64 {
        self.record(PurgeRequest::Single(CacheKey::new(key)));
        0
    }

    fn delete_pattern(&self, pattern: &str) -> u64 {
        self.record(PurgeRequest::Wildcard(CacheKey::new(pattern)));
        0
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        NAME
    }
}
