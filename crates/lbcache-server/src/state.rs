//! Application state shared across handlers.

use std::sync::Arc;

use lbcache_backend::SharedBackend;
use lbcache_cache::FreshnessCache;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Holds no mutable state; everything cached lives in the store behind
/// [`FreshnessCache`].
#[derive(Clone)]
pub struct AppState {
    /// Freshness cache over the key-value store.
    pub cache: FreshnessCache,

    /// Upstream data source.
    pub backend: SharedBackend,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(cache: FreshnessCache, backend: SharedBackend, config: ServerConfig) -> Self {
        Self {
            cache,
            backend,
            config: Arc::new(config),
        }
    }
}
