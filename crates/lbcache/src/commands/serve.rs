//! Serve command - runs the caching proxy.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use lbcache_backend::{LetterboxdBackend, LetterboxdConfig, SharedBackend};
use lbcache_cache::{CacheConfig, FreshnessCache};
use lbcache_config::LbCacheConfig;
use lbcache_server::{Server, ServerConfig};

use super::Context;

/// Arguments for the serve command.
///
/// CLI arguments override environment and config file values.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to, host:port (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Store URL: redis://, rediss:// or memory:// (overrides config)
    #[arg(long)]
    pub store_url: Option<String>,

    /// Seconds before a cached view is refreshed (overrides config)
    #[arg(long)]
    pub refresh_window: Option<u64>,

    /// Cache key namespace (overrides config)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Letterboxd site root (overrides config)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Disable per-request logging
    #[arg(long)]
    pub no_request_logging: bool,
}

impl ServeArgs {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: &mut LbCacheConfig) {
        if let Some(ref bind) = self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(ref url) = self.store_url {
            config.store.url = url.clone();
        }
        if let Some(secs) = self.refresh_window {
            config.cache.refresh_window_secs = secs;
        }
        if let Some(ref ns) = self.namespace {
            config.cache.namespace = ns.clone();
        }
        if let Some(ref url) = self.backend_url {
            config.backend.base_url = url.clone();
        }
        if self.no_request_logging {
            config.server.request_logging = false;
        }
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: Context) -> Result<()> {
    let mut config = ctx.config;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let bind_address = config.bind_address()?;

    // Connect up front so a bad store address fails here, not on the first request.
    let store = lbcache_store::open(&config.store.url)
        .await
        .with_context(|| format!("failed to open store at {}", config.store.url))?;

    let cache = FreshnessCache::new(store, cache_config(&config));

    let backend: SharedBackend = Arc::new(
        LetterboxdBackend::new(letterboxd_config(&config))
            .context("failed to build Letterboxd client")?,
    );

    info!(
        store = cache.store().name(),
        namespace = %config.cache.namespace,
        refresh_window_secs = config.cache.refresh_window_secs,
        backend = backend.name(),
        "Cache ready"
    );

    let server_config = ServerConfig::new()
        .with_bind_address(bind_address)
        .with_request_logging(config.server.request_logging);

    if ctx.verbose {
        println!("Listening on http://{bind_address}");
        println!("API docs at http://{bind_address}/docs");
    }

    Server::new(cache, backend, server_config)
        .run()
        .await
        .context("server failed")?;

    Ok(())
}

fn cache_config(config: &LbCacheConfig) -> CacheConfig {
    CacheConfig::new()
        .with_namespace(config.cache.namespace.clone())
        .with_refresh_window(config.refresh_window())
}

fn letterboxd_config(config: &LbCacheConfig) -> LetterboxdConfig {
    LetterboxdConfig::default()
        .with_base_url(config.backend.base_url.clone())
        .with_timeout(config.backend.timeout())
        .with_user_agent(config.backend.user_agent.clone())
        .with_max_pages(config.backend.max_pages)
}
