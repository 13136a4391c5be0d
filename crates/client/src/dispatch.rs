//! Purge dispatch.
//!
//! Turns URLs (or explicit cache keys) into classified purge requests and
//! hands each one to the backend:
//!
//! 1. Invalid URLs are skipped; siblings in the batch are unaffected.
//! 2. Keys are derived through the codec, hooks included.
//! 3. Keys containing `*` go to `delete_pattern`, everything else to `delete_key`.
//!
//! Dispatch is fire-and-forget: nothing is aggregated or returned.

use std::sync::Arc;

use pagepurge_core::url::trailing_slash;
use pagepurge_core::{CacheKey, CacheKeyCodec, Error, Filter, PurgeLog, PurgeRequest, WILDCARD, validate};

use crate::backend::PurgeBackend;

/// Central purge orchestrator. Holds the one backend for the process.
pub struct Purger {
    codec: CacheKeyCodec,
    backend: Arc<dyn PurgeBackend>,
    purge_all_filter: Filter<String>,
    log: PurgeLog,
}

impl Purger {
    pub fn new(codec: CacheKeyCodec, backend: Arc<dyn PurgeBackend>, log: PurgeLog) -> Self {
        Self { codec, backend, purge_all_filter: Filter::new(), log }
    }

    /// Override the URL built by [`Purger::purge_all`].
    pub fn with_purge_all_filter(mut self, filter: Filter<String>) -> Self {
        self.purge_all_filter = filter;
        self
    }

    pub fn log(&self) -> PurgeLog {
        self.log
    }

    /// Purge an ordered batch of URLs.
    pub fn purge<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            self.purge_one(url.as_ref());
        }
    }

    /// Purge a single URL (a one-element batch).
    pub fn purge_url(&self, url: &str) {
        self.purge([url]);
    }

    /// Purge explicit cache keys, bypassing URL validation and derivation.
    pub fn purge_keys<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.submit(PurgeRequest::from(CacheKey::new(key)));
        }
    }

    /// Purge the whole cache namespace for a site: `{site-root}*`.
    pub fn purge_all(&self, site_url: &str) {
        let url = format!("{}{WILDCARD}", trailing_slash(site_url));
        let url = self.purge_all_filter.apply(url, &());
        if self.log.enabled() {
            tracing::info!(url = %url, "Purging all cached pages");
        }
        self.purge_url(&url);
    }

    /// Deliver one request to the backend on its signal.
    ///
    /// Returns the backend's count, 0 when nothing matched or the call failed.
    pub fn submit(&self, request: PurgeRequest) -> u64 {
        match &request {
            PurgeRequest::Single(key) => self.backend.delete_key(key.as_str()),
            PurgeRequest::Wildcard(pattern) => self.backend.delete_pattern(pattern.as_str()),
        }
    }

    fn purge_one(&self, url: &str) {
        let parsed = match validate(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                if self.log.enabled() {
                    let e = Error::from(e);
                    tracing::info!(url, code = e.code(), error = %e, "Skipping invalid purge URL");
                }
                return;
            }
        };

        let key = self.codec.derive(&parsed);
        if self.log.enabled() {
            tracing::info!(url, cache_key = %key, "Purging");
        }
        self.submit(PurgeRequest::from(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DryRunBackend;

    fn purger() -> (Purger, Arc<DryRunBackend>) {
        purger_with(CacheKeyCodec::default())
    }

    fn purger_with(codec: CacheKeyCodec) -> (Purger, Arc<DryRunBackend>) {
        let backend = Arc::new(DryRunBackend::default());
        let purger = Purger::new(codec, backend.clone(), PurgeLog::new(true));
        (purger, backend)
    }

    #[test]
    fn test_wildcard_url_goes_to_pattern_delete() {
        let (purger, backend) = purger();
        purger.purge_url("https://example.com/posts/*");

        assert_eq!(backend.patterns(), vec!["nginx-cache:httpsGETexample.com/posts/*"]);
        assert!(backend.exact_keys().is_empty());
    }

    #[test]
    fn test_plain_url_goes_to_exact_delete() {
        let (purger, backend) = purger();
        purger.purge_url("https://example.com/");

        assert_eq!(backend.exact_keys(), vec!["nginx-cache:httpsGETexample.com/"]);
        assert!(backend.patterns().is_empty());
    }

    #[test]
    fn test_invalid_url_does_not_affect_siblings() {
        let (purger, backend) = purger();
        purger.purge(["https://example.com/a/", "not a url", "ftp://example.com/x", "https://example.com/b/*"]);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], PurgeRequest::Single(CacheKey::new("nginx-cache:httpsGETexample.com/a/")));
        assert_eq!(requests[1], PurgeRequest::Wildcard(CacheKey::new("nginx-cache:httpsGETexample.com/b/*")));
    }

    #[test]
    fn test_backslash_url_is_dropped_not_turned_into_root_key() {
        let (purger, backend) = purger();
        purger.purge([r"https://example.com\blog\*", "https://example.com/blog/*"]);

        assert!(backend.exact_keys().is_empty());
        assert_eq!(backend.patterns(), vec!["nginx-cache:httpsGETexample.com/blog/*"]);
    }

    #[test]
    fn test_batch_order_is_preserved() {
        let (purger, backend) = purger();
        let urls = vec!["https://example.com/3".to_string(), "https://example.com/1".into(), "https://example.com/2".into()];
        purger.purge(&urls);

        let keys: Vec<_> = backend.requests().iter().map(|r| r.key().to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "nginx-cache:httpsGETexample.com/3",
                "nginx-cache:httpsGETexample.com/1",
                "nginx-cache:httpsGETexample.com/2",
            ]
        );
    }

    #[test]
    fn test_same_url_twice_derives_same_key() {
        let (purger, backend) = purger();
        purger.purge_url("https://example.com/retry/");
        purger.purge_url("https://example.com/retry/");

        let requests = backend.requests();
        assert_eq!(requests[0], requests[1]);
    }

    #[test]
    fn test_purge_all() {
        let (purger, backend) = purger();
        purger.purge_all("https://example.com/");

        assert_eq!(backend.patterns(), vec!["nginx-cache:httpsGETexample.com/*"]);
        assert!(backend.exact_keys().is_empty());
    }

    #[test]
    fn test_purge_all_adds_trailing_slash() {
        let (purger, backend) = purger();
        purger.purge_all("https://example.com");

        assert_eq!(backend.patterns(), vec!["nginx-cache:httpsGETexample.com/*"]);
    }

    #[test]
    fn test_purge_all_filter() {
        let (purger, backend) = purger();
        let purger = purger.with_purge_all_filter(Filter::new().with(|_, _| "https://example.com/blog/*".to_string()));
        purger.purge_all("https://example.com/");

        assert_eq!(backend.patterns(), vec!["nginx-cache:httpsGETexample.com/blog/*"]);
    }

    #[test]
    fn test_key_filter_can_turn_exact_into_pattern() {
        let codec = CacheKeyCodec::default().with_key_filter(Filter::new().with(|key, _| format!("{key}*")));
        let (purger, backend) = purger_with(codec);
        purger.purge_url("https://example.com/feed/");

        assert_eq!(backend.patterns(), vec!["nginx-cache:httpsGETexample.com/feed/*"]);
    }

    #[test]
    fn test_purge_keys_classifies_explicit_keys() {
        let (purger, backend) = purger();
        purger.purge_keys(["nginx-cache:httpsGETexample.com/", "nginx-cache:httpGETexample.com*"]);

        assert_eq!(backend.exact_keys(), vec!["nginx-cache:httpsGETexample.com/"]);
        assert_eq!(backend.patterns(), vec!["nginx-cache:httpGETexample.com*"]);
    }

    #[test]
    fn test_submit_zero_is_not_an_error() {
        let (purger, _backend) = purger();
        let deleted = purger.submit(PurgeRequest::Wildcard(CacheKey::new("nginx-cache:httpsGETnothing.test/*")));
        assert_eq!(deleted, 0);
    }

    #[test]
    fn test_logging_disabled_still_purges() {
        let backend = Arc::new(DryRunBackend::default());
        let purger = Purger::new(CacheKeyCodec::default(), backend.clone(), PurgeLog::disabled());
        purger.purge_url("https://example.com/quiet/");

        assert_eq!(backend.requests().len(), 1);
        assert!(!purger.log().enabled());
    }
}
