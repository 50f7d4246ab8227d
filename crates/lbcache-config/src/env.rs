//! Environment variable overrides.
//!
//! Applied after the config file and before CLI flags. Lookups go through a
//! closure so tests can supply a map instead of the process environment.

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::types::LbCacheConfig;

pub const BIND_ENV: &str = "LBCACHE_BIND";
pub const STORE_URL_ENV: &str = "LBCACHE_STORE_URL";
/// Fallback for [`STORE_URL_ENV`], the name most Redis tooling uses.
pub const REDIS_URL_ENV: &str = "REDIS_URL";
pub const NAMESPACE_ENV: &str = "LBCACHE_NAMESPACE";
pub const REFRESH_WINDOW_ENV: &str = "LBCACHE_REFRESH_WINDOW";
pub const BACKEND_URL_ENV: &str = "LBCACHE_BACKEND_URL";
pub const LOG_DIR_ENV: &str = "LBCACHE_LOG_DIR";

/// Apply overrides from the process environment.
pub fn apply_process_env(config: &mut LbCacheConfig) -> Result<()> {
    apply_env(config, |name| std::env::var(name).ok())
}

/// Apply overrides using `lookup` to read variables. Empty values are ignored.
pub fn apply_env<F>(config: &mut LbCacheConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get(BIND_ENV) {
        config.server.bind = bind;
    }

    if let Some(url) = get(STORE_URL_ENV).or_else(|| get(REDIS_URL_ENV)) {
        config.store.url = url;
    }

    if let Some(ns) = get(NAMESPACE_ENV) {
        config.cache.namespace = ns;
    }

    if let Some(raw) = get(REFRESH_WINDOW_ENV) {
        config.cache.refresh_window_secs =
            raw.trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnv {
                    var: REFRESH_WINDOW_ENV,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
    }

    if let Some(url) = get(BACKEND_URL_ENV) {
        config.backend.base_url = url;
    }

    if let Some(dir) = get(LOG_DIR_ENV) {
        config.logging.dir = Some(PathBuf::from(dir));
    }

    Ok(())
}
