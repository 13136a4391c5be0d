//! Process-wide logging switch for the purge path.

/// Gate for purge-path logging.
///
/// Resolved once from configuration and copied into every component that
/// logs. When disabled, call sites skip their `tracing` macros entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeLog {
    enabled: bool,
}

impl PurgeLog {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    pub const fn enabled(self) -> bool {
        self.enabled
    }
}

impl From<bool> for PurgeLog {
    fn from(enabled: bool) -> Self {
        Self::new(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        assert!(!PurgeLog::default().enabled());
        assert_eq!(PurgeLog::default(), PurgeLog::disabled());
    }

    #[test]
    fn test_from_bool() {
        assert!(PurgeLog::from(true).enabled());
    }
}
