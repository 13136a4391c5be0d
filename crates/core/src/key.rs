//! Cache key derivation.
//!
//! Keys follow the nginx `proxy_cache_key`/`srcache` layout used by the page
//! cache: `{prefix}{scheme}GET{host}{path}`. Only GET responses are cached,
//! so the method token is fixed.

use std::fmt;

use crate::hooks::Filter;
use crate::url::PurgeUrl;

/// Sentinel that turns a key into a glob pattern.
pub const WILDCARD: char = '*';

/// Prefix used when configuration does not override it.
pub const DEFAULT_PREFIX: &str = "nginx-cache:";

const METHOD: &str = "GET";

/// A cache key as stored in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// True when the key contains the wildcard sentinel and must be purged by pattern.
    pub fn is_pattern(&self) -> bool {
        self.0.contains(WILDCARD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the cache key for a validated URL.
///
/// Pure: the same `(url, prefix)` always yields the same key, so a failed
/// purge can be retried by re-deriving.
pub fn derive_key(url: &PurgeUrl, prefix: &str) -> CacheKey {
    let mut key = String::with_capacity(prefix.len() + url.scheme().len() + METHOD.len() + url.host().len() + url.path().len());
    key.push_str(prefix);
    key.push_str(url.scheme());
    key.push_str(METHOD);
    key.push_str(url.host());
    key.push_str(url.path());
    CacheKey(key)
}

/// Context handed to the key filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyContext {
    /// The URL the key was derived from, as submitted.
    pub url: String,
    /// The prefix after the prefix filter ran.
    pub prefix: String,
}

/// Cache key codec with the configured prefix and override hooks.
#[derive(Debug)]
pub struct CacheKeyCodec {
    prefix: String,
    prefix_filter: Filter<String>,
    key_filter: Filter<String, KeyContext>,
}

impl CacheKeyCodec {
    /// Create a codec with no hooks registered.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), prefix_filter: Filter::new(), key_filter: Filter::new() }
    }

    /// Override the prefix before every derivation (per-site or per-environment namespacing).
    pub fn with_prefix_filter(mut self, filter: Filter<String>) -> Self {
        self.prefix_filter = filter;
        self
    }

    /// Override the final key.
    pub fn with_key_filter(mut self, filter: Filter<String, KeyContext>) -> Self {
        self.key_filter = filter;
        self
    }

    /// The effective prefix after the prefix filter.
    pub fn prefix(&self) -> String {
        self.prefix_filter.apply(self.prefix.clone(), &())
    }

    /// Derive the key for `url`, running both hooks.
    pub fn derive(&self, url: &PurgeUrl) -> CacheKey {
        let prefix = self.prefix();
        let key = derive_key(url, &prefix);
        if self.key_filter.is_empty() {
            return key;
        }

        let context = KeyContext { url: url.as_str().to_string(), prefix };
        CacheKey(self.key_filter.apply(key.into_string(), &context))
    }
}

impl Default for CacheKeyCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// One unit of purge work, classified by key shape.
///
/// `Single` corresponds to the purge-single-key signal and `Wildcard` to
/// purge-wildcard-key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PurgeRequest {
    Single(CacheKey),
    Wildcard(CacheKey),
}

impl PurgeRequest {
    pub fn key(&self) -> &CacheKey {
        match self {
            PurgeRequest::Single(key) | PurgeRequest::Wildcard(key) => key,
        }
    }

    /// Name of the signal this request is delivered on.
    pub fn signal(&self) -> &'static str {
        match self {
            PurgeRequest::Single(_) => "purge_single_key",
            PurgeRequest::Wildcard(_) => "purge_wildcard_key",
        }
    }
}

impl From<CacheKey> for PurgeRequest {
    fn from(key: CacheKey) -> Self {
        if key.is_pattern() { PurgeRequest::Wildcard(key) } else { PurgeRequest::Single(key) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::validate;

    fn key_for(url: &str, prefix: &str) -> String {
        derive_key(&validate(url).unwrap(), prefix).into_string()
    }

    #[test]
    fn test_derive_key_example() {
        assert_eq!(key_for("https://example.com/foo/bar", "nginx-cache:"), "nginx-cache:httpsGETexample.com/foo/bar");
    }

    #[test]
    fn test_derive_key_stability() {
        let first = key_for("https://example.com/2024/05/hello/", "nginx-cache:");
        let second = key_for("https://example.com/2024/05/hello/", "nginx-cache:");
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_key_without_path() {
        assert_eq!(key_for("http://example.com", "nginx-cache:"), "nginx-cache:httpGETexample.com");
    }

    #[test]
    fn test_derive_key_wildcard() {
        let key = derive_key(&validate("https://example.com/posts/*").unwrap(), DEFAULT_PREFIX);
        assert_eq!(key.as_str(), "nginx-cache:httpsGETexample.com/posts/*");
        assert!(key.is_pattern());
    }

    #[test]
    fn test_derive_key_ignores_query() {
        assert_eq!(key_for("https://example.com/search?q=rust", ""), "httpsGETexample.com/search");
    }

    #[test]
    fn test_codec_default_passes_through() {
        let codec = CacheKeyCodec::default();
        let url = validate("https://example.com/").unwrap();
        assert_eq!(codec.prefix(), "nginx-cache:");
        assert_eq!(codec.derive(&url), derive_key(&url, DEFAULT_PREFIX));
    }

    #[test]
    fn test_codec_prefix_filter() {
        let codec = CacheKeyCodec::default().with_prefix_filter(Filter::new().with(|prefix, _| format!("staging:{prefix}")));
        let url = validate("https://example.com/a").unwrap();
        assert_eq!(codec.derive(&url).as_str(), "staging:nginx-cache:httpsGETexample.com/a");
    }

    #[test]
    fn test_codec_key_filter_sees_context() {
        let codec = CacheKeyCodec::new("pc:").with_key_filter(Filter::new().with(|key: String, ctx: &KeyContext| {
            assert_eq!(ctx.url, "https://example.com/a");
            assert_eq!(ctx.prefix, "pc:");
            key.to_uppercase()
        }));
        let url = validate("https://example.com/a").unwrap();
        assert_eq!(codec.derive(&url).as_str(), "PC:HTTPSGETEXAMPLE.COM/A");
    }

    #[test]
    fn test_purge_request_classification() {
        let exact = PurgeRequest::from(CacheKey::new("nginx-cache:httpsGETexample.com/"));
        let pattern = PurgeRequest::from(CacheKey::new("nginx-cache:httpsGETexample.com/*"));
        assert!(matches!(exact, PurgeRequest::Single(_)));
        assert!(matches!(pattern, PurgeRequest::Wildcard(_)));
        assert_eq!(exact.signal(), "purge_single_key");
        assert_eq!(pattern.signal(), "purge_wildcard_key");
    }

    #[test]
    fn test_wildcard_anywhere_is_pattern() {
        assert!(CacheKey::new("nginx-cache:*GETexample.com/").is_pattern());
    }
}
