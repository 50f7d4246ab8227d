//! Error types for cache operations.

use lbcache_store::StoreError;

/// Error returned by [`FreshnessCache::get_or_refresh`](crate::FreshnessCache::get_or_refresh).
///
/// `E` is the error type of the caller's fetch function. Malformed stored
/// entries never appear here; they are treated as cache misses.
#[derive(Debug, thiserror::Error)]
pub enum CacheError<E> {
    /// The fetch function failed. Nothing was written.
    #[error("{0}")]
    Fetch(E),

    /// The store could not be read or written.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The fetched payload could not be serialized. Nothing was written.
    #[error("Failed to encode cache entry for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl<E> CacheError<E> {
    /// The fetch error, if this failure came from the fetch function.
    pub fn fetch_error(&self) -> Option<&E> {
        match self {
            CacheError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}
