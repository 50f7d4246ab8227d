//! Configuration types.
//!
//! Every section and field carries a default, so an empty file (or no file
//! at all) yields a working configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:6996";
/// Default store connection URL.
pub const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";
/// Default cache key namespace.
pub const DEFAULT_NAMESPACE: &str = "lb";
/// Default refresh window in seconds.
pub const DEFAULT_REFRESH_WINDOW_SECS: u64 = 300;
/// Default upstream site.
pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";
/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default upstream user agent.
pub const DEFAULT_USER_AGENT: &str = concat!("lbcache/", env!("CARGO_PKG_VERSION"));
/// Default cap on listing pages fetched per request.
pub const DEFAULT_MAX_PAGES: u32 = 250;
/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

// ─────────────────────────────────────────────────────────────────────────────
// Root
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LbCacheConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Key-value store settings.
    pub store: StoreConfig,
    /// Freshness cache settings.
    pub cache: FreshnessConfig,
    /// Upstream site settings.
    pub backend: BackendConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl LbCacheConfig {
    /// Create a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.bind_address()?;

        if self.store.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.url",
                reason: "must not be empty".to_string(),
            });
        }

        let ns = &self.cache.namespace;
        if ns.is_empty() || ns.contains(':') {
            return Err(ConfigError::Invalid {
                field: "cache.namespace",
                reason: format!("'{ns}' must be non-empty and must not contain ':'"),
            });
        }

        let base = &self.backend.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "backend.base_url",
                reason: format!("'{base}' is not an http(s) URL"),
            });
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "backend.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.backend.max_pages == 0 {
            return Err(ConfigError::Invalid {
                field: "backend.max_pages",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// The parsed listen address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                field: "server.bind",
                reason: format!("'{}': {e}", self.server.bind),
            })
    }

    /// The refresh window as a duration.
    pub fn refresh_window(&self) -> Duration {
        Duration::from_secs(self.cache.refresh_window_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to, `host:port`.
    pub bind: String,
    /// Enable per-request logging.
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            request_logging: true,
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store URL. `redis://`, `rediss://` or `memory://`.
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_string(),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    /// Prefix for every cache key.
    pub namespace: String,
    /// Maximum age in seconds before an entry is refreshed.
    pub refresh_window_secs: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            refresh_window_secs: DEFAULT_REFRESH_WINDOW_SECS,
        }
    }
}

/// `[backend]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Stop paging listings after this many pages.
    pub max_pages: u32,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily-rolling JSON log files. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
