//! Configuration for the lbcache proxy.
//!
//! Provides TOML-based configuration with:
//! - Defaulted sections (`[server]`, `[store]`, `[cache]`, `[backend]`, `[logging]`)
//! - Config file discovery (`--config`, `LBCACHE_CONFIG_DIR`, platform config dir)
//! - Environment variable overrides applied on top of the file

pub mod discovery;
pub mod env;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigSource, LoadedConfig, config_dir, config_path, load_config,
    load_config_file, load_config_with_options, save_config,
};
pub use env::{apply_env, apply_process_env};
pub use error::{ConfigError, Result};
pub use types::*;
