//! lbcache - caching proxy for Letterboxd user data.
//!
//! Main entry point for the lbcache CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use lbcache_config::LoggingConfig;

mod commands;

use commands::{config, serve};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// lbcache - caching proxy for Letterboxd user data
#[derive(Parser)]
#[command(name = "lbcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (overrides default discovery)
    #[arg(long, global = true, env = "LBCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = lbcache_config::load_config(cli.config.as_deref())?;
    let mut config = loaded.config;
    lbcache_config::apply_process_env(&mut config)?;

    let _guard = init_tracing(&config.logging, cli.verbose)?;

    match loaded.source {
        Some(ref source) if source.loaded => {
            tracing::debug!(path = %source.path.display(), "Using config file");
        }
        _ => tracing::debug!("No config file found, using defaults"),
    }

    let ctx = commands::Context {
        config,
        config_source: loaded.source.map(|s| s.path),
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Serve(args) => serve::run(args, ctx).await,
        Commands::Config(args) => config::run(args, &ctx),
    }
}

/// Install the console layer and, when a log directory is configured, a
/// daily-rolling JSON file layer.
///
/// `RUST_LOG` overrides both the configured filter and `--verbose`.
fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let directives = if verbose {
        "lbcache=debug,lbcache_server=debug,lbcache_cache=debug,lbcache_store=debug,lbcache_backend=debug,lbcache_config=debug,info"
    } else {
        logging.filter.as_str()
    };
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .with_context(|| format!("invalid log filter '{directives}'"))?;

    let (file_layer, guard) = match &logging.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "lbcache.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(
                    "lbcache=trace,lbcache_server=trace,lbcache_cache=trace,lbcache_store=debug,lbcache_backend=debug,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
