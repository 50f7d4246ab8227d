//! Configuration for the freshness cache.

use std::time::Duration;

/// Default key namespace.
pub const DEFAULT_NAMESPACE: &str = "lb";

/// Default refresh window (5 minutes).
pub const DEFAULT_REFRESH_WINDOW: Duration = Duration::from_secs(300);

/// Configuration for the freshness cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Prefix for every key, the `{namespace}` in `{namespace}:{view}:{subject}`.
    pub namespace: String,

    /// Maximum age of a payload before it is refreshed.
    pub refresh_window: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            refresh_window: DEFAULT_REFRESH_WINDOW,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the refresh window.
    pub fn with_refresh_window(mut self, window: Duration) -> Self {
        self.refresh_window = window;
        self
    }
}
