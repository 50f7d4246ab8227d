//! Read-through freshness cache.
//!
//! This crate implements the cache-aside protocol used by the lbcache
//! handlers:
//! - entries carry their own fetch timestamp, so the store never expires
//!   anything on its own
//! - a read returns the stored payload while it is younger than the
//!   refresh window
//! - a miss, a stale entry or a malformed entry triggers exactly one call
//!   to the caller's fetch function, whose result overwrites the entry
//! - fetch failures are returned to the caller and never written
//!
//! There is no single-flight coordination. Concurrent requests that all
//! observe the same stale entry each fetch and each write; the last write
//! wins.
//!
//! # Example
//!
//! ```rust,ignore
//! use lbcache_cache::{CacheConfig, FreshnessCache};
//!
//! let cache = FreshnessCache::new(store, CacheConfig::default());
//! let key = cache.key("profile", "alice");
//! let profile = cache
//!     .get_or_refresh(&key, cache.refresh_window(), || backend.profile("alice"))
//!     .await?;
//! ```

mod cache;
mod config;
mod entry;
mod error;
mod key;

pub use cache::{FreshnessCache, Lookup};
pub use config::{CacheConfig, DEFAULT_NAMESPACE, DEFAULT_REFRESH_WINDOW};
pub use entry::{CacheEntry, DecodeError, unix_now};
pub use error::CacheError;
pub use key::CacheKey;
