//! Freshness cache over a key-value store.

use std::future::Future;
use std::time::Duration;

use lbcache_store::{SharedStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::entry::{CacheEntry, unix_now};
use crate::error::CacheError;
use crate::key::CacheKey;

/// Outcome of reading a key without refreshing it.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Entry present and younger than the window.
    Fresh(T),

    /// Entry present but at least as old as the window.
    Stale { age: Duration },

    /// No entry, or an entry that could not be decoded.
    Missing,
}

/// Read-through cache that refreshes entries older than a window.
///
/// The cache holds no state of its own beyond the store handle; all
/// entries live in the store. Cloning is cheap.
#[derive(Clone)]
pub struct FreshnessCache {
    store: SharedStore,
    config: CacheConfig,
}

impl FreshnessCache {
    /// Create a cache over `store`.
    pub fn new(store: SharedStore, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The configured refresh window.
    pub fn refresh_window(&self) -> Duration {
        self.config.refresh_window
    }

    /// The underlying store.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Build a key in this cache's namespace.
    pub fn key(&self, view: &str, subject: &str) -> CacheKey {
        CacheKey::new(&self.config.namespace, view, subject)
    }

    /// Read `key` and classify it against `window`.
    ///
    /// Malformed entries are reported as [`Lookup::Missing`].
    pub async fn lookup<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        window: Duration,
    ) -> Result<Lookup<T>, StoreError> {
        let Some(raw) = self.store.get(key.as_str()).await? else {
            return Ok(Lookup::Missing);
        };

        let entry = match CacheEntry::<T>::decode(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, error = %e, bytes = raw.len(), "Ignoring malformed cache entry");
                return Ok(Lookup::Missing);
            }
        };

        let now = unix_now();
        if entry.is_fresh_at(now, window) {
            Ok(Lookup::Fresh(entry.payload))
        } else {
            Ok(Lookup::Stale {
                age: entry.age_at(now),
            })
        }
    }

    /// Return the cached value for `key`, refreshing it with `fetch` when
    /// it is missing, malformed, or at least `window` old.
    ///
    /// On a fresh hit `fetch` is not called and nothing is written. On a
    /// refresh `fetch` is called exactly once; its value is stamped with
    /// the current time and overwrites the entry. If `fetch` fails, the
    /// error is returned and the store is left untouched, so a stale entry
    /// survives but is never served.
    ///
    /// Concurrent callers that observe the same stale entry each fetch and
    /// each write. The last write wins.
    pub async fn get_or_refresh<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        window: Duration,
        fetch: F,
    ) -> Result<T, CacheError<E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.lookup::<T>(key, window).await? {
            Lookup::Fresh(payload) => {
                trace!(key = %key, "Cache hit");
                return Ok(payload);
            }
            Lookup::Stale { age } => {
                debug!(key = %key, age_secs = age.as_secs_f64(), "Cache entry stale, refreshing");
            }
            Lookup::Missing => {
                debug!(key = %key, "Cache miss, fetching");
            }
        }

        let payload = fetch().await.map_err(CacheError::Fetch)?;

        let entry = CacheEntry::now(payload);
        let bytes = entry.encode().map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.store.set(key.as_str(), bytes).await?;
        debug!(key = %key, ts = entry.ts, "Cache entry written");

        Ok(entry.payload)
    }
}

impl std::fmt::Debug for FreshnessCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshnessCache")
            .field("store", &self.store.name())
            .field("config", &self.config)
            .finish()
    }
}
