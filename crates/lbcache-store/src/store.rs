//! The store trait and URL-based construction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;

/// A minimal key-value store.
///
/// Implementations must make each `get` and `set` atomic for a single key.
/// No multi-key transactions or compare-and-swap are required.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the raw bytes stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite the value under `key`. No expiry is attached.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Store handle shared across request handlers.
pub type SharedStore = Arc<dyn KvStore>;

/// Open a store from a URL.
///
/// `memory://` selects the in-process [`MemoryStore`]; `redis://`,
/// `rediss://` and `redis+unix://` connect to Redis and verify the
/// connection before returning, so a bad address fails at startup.
pub async fn open(url: &str) -> Result<SharedStore> {
    let scheme = url.split_once("://").map(|(scheme, _)| scheme).unwrap_or("");

    match scheme {
        "memory" => {
            info!("Using in-process memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        "redis" | "rediss" | "redis+unix" => Ok(Arc::new(RedisStore::connect(url).await?)),
        _ => Err(StoreError::InvalidUrl {
            url: url.to_string(),
            reason: "expected memory://, redis://, rediss:// or redis+unix://".to_string(),
        }),
    }
}
