//! Redis-backed store.

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::store::KvStore;

/// A [`KvStore`] backed by Redis.
///
/// Uses a [`ConnectionManager`], which multiplexes commands over one
/// connection and reconnects on failure. Cloning is cheap.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and verify the connection with `PING`.
    pub async fn connect(url: &str) -> Result<Self> {
        info!(url = %url, "Connecting to Redis");

        let client = Client::open(url).map_err(|e| StoreError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connect(format!("{}: {}", url, e)))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Connect(format!("PING to {} failed: {}", url, e)))?;

        if pong != "PONG" {
            return Err(StoreError::Connect(format!(
                "unexpected PING reply from {}: {}",
                url, pong
            )));
        }

        info!(url = %url, "Redis connection established");

        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async::<Option<Vec<u8>>>(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Redis GET failed");
                StoreError::Command {
                    command: "GET",
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Redis SET failed");
                StoreError::Command {
                    command: "SET",
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })
    }

    fn name(&self) -> &str {
        "redis"
    }
}
