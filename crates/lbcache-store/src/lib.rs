//! Key-value store clients for lbcache.
//!
//! The cache layer only needs two operations from its store: read the raw
//! bytes under a key and blindly overwrite them. This crate provides:
//! - [`KvStore`], the async trait the cache is written against
//! - [`RedisStore`], backed by a Redis connection manager
//! - [`MemoryStore`], an in-process map for tests and local runs
//!
//! Entries are written without a store-level TTL; freshness is encoded in
//! the entry itself by the cache layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use lbcache_store::{KvStore, RedisStore};
//!
//! let store = RedisStore::connect("redis://127.0.0.1:6379").await?;
//! store.set("lb:profile:alice", b"{}".to_vec()).await?;
//! let raw = store.get("lb:profile:alice").await?;
//! ```

mod error;
mod memory;
mod redis_store;
mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{KvStore, SharedStore, open};
