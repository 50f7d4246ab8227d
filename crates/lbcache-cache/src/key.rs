//! Cache key scheme.

use std::fmt;

/// A cache key of the form `{namespace}:{view}:{subject}`.
///
/// The subject is used verbatim, so keys are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from its three parts.
    pub fn new(namespace: &str, view: &str, subject: &str) -> Self {
        Self(format!("{}:{}:{}", namespace, view, subject))
    }

    /// The rendered key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = CacheKey::new("lb", "films", "someuser");
        assert_eq!(key.as_str(), "lb:films:someuser");
        assert_eq!(key.to_string(), "lb:films:someuser");
    }

    #[test]
    fn test_key_is_case_sensitive() {
        let lower = CacheKey::new("lb", "profile", "alice");
        let upper = CacheKey::new("lb", "profile", "Alice");
        assert_ne!(lower, upper);
    }
}
