//! In-memory backend for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::{BackendError, Result};
use crate::types::{Film, Profile, View};

/// Canned data for one user.
#[derive(Debug, Clone, Default)]
pub struct MockUser {
    pub profile: Profile,
    pub following: Vec<String>,
    pub followers: Vec<String>,
    pub films: Vec<Film>,
}

impl MockUser {
    /// A user whose profile holds just a `username` attribute.
    pub fn new(username: &str) -> Self {
        let mut profile = Profile::new();
        profile.insert("username".into(), username.into());
        Self {
            profile,
            ..Default::default()
        }
    }

    /// Add a profile attribute.
    pub fn with_attr(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.profile.insert(key.to_string(), value.into());
        self
    }

    /// Set the following list.
    pub fn with_following(mut self, names: &[&str]) -> Self {
        self.following = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set the followers list.
    pub fn with_followers(mut self, names: &[&str]) -> Self {
        self.followers = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set the watched films.
    pub fn with_films(mut self, films: &[(&str, &str)]) -> Self {
        self.films = films.iter().map(|(t, s)| Film::new(*t, *s)).collect();
        self
    }
}

/// A mock backend for testing purposes.
///
/// Serves [`MockUser`]s by username, counts calls per view, and can be
/// switched into a failing mode or slowed down.
#[derive(Debug, Default)]
pub struct MockBackend {
    users: Mutex<HashMap<String, MockUser>>,
    calls: Mutex<HashMap<View, usize>>,
    failure: Mutex<Option<String>>,
    delay: Option<Duration>,
}

impl MockBackend {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user.
    pub fn with_user(self, user: MockUser) -> Self {
        self.insert_user(user);
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add or replace a user.
    pub fn insert_user(&self, user: MockUser) {
        let name = user
            .profile
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        self.users.lock().unwrap().insert(name, user);
    }

    /// Make every subsequent call fail with `Upstream(message)`, or clear
    /// the failure with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    /// Number of calls made for `view`.
    pub fn calls(&self, view: View) -> usize {
        self.calls.lock().unwrap().get(&view).copied().unwrap_or(0)
    }

    /// Number of calls made across all views.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    async fn answer<T>(&self, view: View, username: &str, pick: fn(&MockUser) -> T) -> Result<T> {
        *self.calls.lock().unwrap().entry(view).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(BackendError::Upstream(message));
        }

        self.users
            .lock()
            .unwrap()
            .get(username)
            .map(pick)
            .ok_or_else(|| BackendError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn profile(&self, username: &str) -> Result<Profile> {
        self.answer(View::Profile, username, |u| u.profile.clone()).await
    }

    async fn following(&self, username: &str) -> Result<Vec<String>> {
        self.answer(View::Following, username, |u| u.following.clone()).await
    }

    async fn followers(&self, username: &str) -> Result<Vec<String>> {
        self.answer(View::Followers, username, |u| u.followers.clone()).await
    }

    async fn watched_films(&self, username: &str) -> Result<Vec<Film>> {
        self.answer(View::WatchedFilms, username, |u| u.films.clone()).await
    }
}
