//! The persisted entry envelope.
//!
//! Every stored value is a JSON object `{"payload": <value>, "ts": <secs>}`
//! where `ts` is the Unix time, in fractional seconds, at which the
//! payload was produced by the backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Current Unix time in seconds, with microsecond precision.
pub fn unix_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Reasons a stored entry could not be read back.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Not JSON, missing fields, or a payload of the wrong shape.
    #[error("malformed entry: {0}")]
    Json(#[from] serde_json::Error),

    /// The timestamp is NaN or infinite.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(f64),
}

/// A payload together with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached value, opaque to the cache.
    pub payload: T,

    /// Seconds since the Unix epoch when `payload` was fetched.
    pub ts: f64,
}

impl<T> CacheEntry<T> {
    /// Wrap a payload with an explicit timestamp.
    pub fn new(payload: T, ts: f64) -> Self {
        Self { payload, ts }
    }

    /// Wrap a payload stamped with the current time.
    pub fn now(payload: T) -> Self {
        Self::new(payload, unix_now())
    }

    /// Age of the entry relative to `now`.
    ///
    /// Timestamps in the future count as age zero.
    pub fn age_at(&self, now: f64) -> Duration {
        let secs = now - self.ts;
        if secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Check if the entry is younger than `window` at time `now`.
    pub fn is_fresh_at(&self, now: f64, window: Duration) -> bool {
        self.age_at(now) < window
    }
}

impl<T: Serialize> CacheEntry<T> {
    /// Serialize to the wire format.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl<T: DeserializeOwned> CacheEntry<T> {
    /// Parse from the wire format.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let entry: Self = serde_json::from_slice(bytes)?;
        if !entry.ts.is_finite() {
            return Err(DecodeError::InvalidTimestamp(entry.ts));
        }
        Ok(entry)
    }
}
