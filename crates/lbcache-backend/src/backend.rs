//! The backend trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Film, Profile};

/// Source of per-user data, one method per view.
///
/// Calls may perform network I/O with unbounded latency; callers should
/// not assume they are cheap. Failures are either `NotFound` or `Upstream`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Profile attributes for `username`.
    async fn profile(&self, username: &str) -> Result<Profile>;

    /// Usernames that `username` follows.
    async fn following(&self, username: &str) -> Result<Vec<String>>;

    /// Usernames that follow `username`.
    async fn followers(&self, username: &str) -> Result<Vec<String>>;

    /// Films `username` has marked as watched.
    async fn watched_films(&self, username: &str) -> Result<Vec<Film>>;
}

/// Backend handle shared across request handlers.
pub type SharedBackend = Arc<dyn Backend>;
