//! CLI command handlers.

pub mod config;
pub mod serve;

use std::path::PathBuf;

use lbcache_config::LbCacheConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration after the file and environment layers.
    pub config: LbCacheConfig,
    /// Config file that was looked for, whether or not it existed.
    pub config_source: Option<PathBuf>,
    /// Verbose output enabled.
    pub verbose: bool,
}
