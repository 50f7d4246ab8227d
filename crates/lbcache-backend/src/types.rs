//! View selectors and the values they produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema-less profile data: whatever attributes the backend found.
pub type Profile = serde_json::Map<String, serde_json::Value>;

/// One of the data shapes served per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Profile,
    Following,
    Followers,
    WatchedFilms,
}

impl View {
    /// All views, in route order.
    pub const ALL: [View; 4] = [
        View::Profile,
        View::Following,
        View::Followers,
        View::WatchedFilms,
    ];

    /// The segment used in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Profile => "profile",
            View::Following => "following",
            View::Followers => "followers",
            View::WatchedFilms => "films",
        }
    }

    /// Human-readable noun for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            View::Profile => "user",
            View::Following => "following",
            View::Followers => "followers",
            View::WatchedFilms => "watched films",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A watched film as a `(title, slug)` pair.
///
/// Serializes as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Film(pub String, pub String);

impl Film {
    /// Create a film entry.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self(title.into(), slug.into())
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.0
    }

    /// URL slug, e.g. `heat-1995`.
    pub fn slug(&self) -> &str {
        &self.1
    }
}
