//! Config command - configuration management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use lbcache_config::LbCacheConfig;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration (file + environment) as TOML
    Show,

    /// Show the configuration file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            print!("{}", ctx.config.to_toml()?);
        }
        ConfigCommand::Path => match &ctx.config_source {
            Some(path) => println!("{}", path.display()),
            None => bail!("no config directory available on this platform"),
        },
        ConfigCommand::Init { force } => {
            let Some(path) = &ctx.config_source else {
                bail!("no config directory available on this platform");
            };
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            lbcache_config::save_config(&LbCacheConfig::default(), path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
