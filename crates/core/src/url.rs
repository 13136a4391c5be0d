//! URL validation for purge batches.
//!
//! Purge input is strict: nothing is defaulted or repaired. A URL that is not
//! absolute `http`/`https` with a host is rejected, and the dispatcher drops
//! it from the batch.

use url::Url;

/// Error type for URL validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("URL contains whitespace")]
    Whitespace,

    #[error("URL contains a backslash")]
    Backslash,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// A URL that passed validation, split into the parts a cache key is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeUrl {
    input: String,
    url: Url,
    has_path: bool,
}

impl PurgeUrl {
    /// URL scheme, `http` or `https`.
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Lowercased host without port.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Path as written, or the empty string when the input had none.
    ///
    /// `https://example.com` has no path while `https://example.com/` has `/`.
    pub fn path(&self) -> &str {
        if self.has_path { self.url.path() } else { "" }
    }

    /// True when the path ends in the wildcard sentinel.
    pub fn is_wildcard(&self) -> bool {
        self.path().ends_with(crate::key::WILDCARD)
    }

    /// The URL exactly as it was submitted.
    pub fn as_str(&self) -> &str {
        &self.input
    }

}

/// Validate a purge URL.
///
/// Rules:
/// 1. Non-empty, no whitespace or `\` anywhere (nothing is trimmed or rewritten)
/// 2. Absolute, with `://` after the scheme
/// 3. Scheme is `http` or `https`
/// 4. Host is present
///
/// A trailing `*` in the path is kept verbatim.
pub fn validate(input: &str) -> Result<PurgeUrl, UrlError> {
    if input.is_empty() {
        return Err(UrlError::Empty);
    }
    if input.chars().any(char::is_whitespace) {
        return Err(UrlError::Whitespace);
    }
    if input.contains('\\') {
        return Err(UrlError::Backslash);
    }

    let Some((_, rest)) = input.split_once("://") else {
        return Err(UrlError::InvalidUrl(format!("not an absolute URL: {input}")));
    };

    let url = Url::parse(input).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost(input.to_string()));
    }

    let has_path = rest
        .find(['/', '?', '#'])
        .is_some_and(|idx| rest[idx..].starts_with('/'));

    Ok(PurgeUrl { input: input.to_string(), url, has_path })
}

/// Append a trailing slash unless one is already present.
pub fn trailing_slash(url: &str) -> String {
    if url.ends_with('/') { url.to_string() } else { format!("{url}/") }
}
