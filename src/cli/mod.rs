//! Command-line interface for the launcher.
//!
//! Each subcommand drives exactly one pipeline operation (or, for `run`, a
//! sequence of them awaited one after another), so at most one operation is
//! ever in flight.
//!
//! # Commands
//!
//! - `check`: compare the installed version with the latest release
//! - `install`: download and install an asset URL as a given version
//! - `launch`: start the installed game
//! - `run`: check, install when needed, then launch
//! - `status`: show the on-disk layout and the installed version
//! - `config`: show or initialize the configuration file
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: no logging
//! - `--config <PATH>`: config file (also `GAMELAUNCH_CONFIG`)
//! - `--no-progress`: hide progress bars
//!
//! Logs go to stderr; `RUST_LOG` overrides the level chosen by the flags.

mod check;
mod config;
mod install;
mod launch;
mod run;
mod status;

use crate::config::{CONFIG_ENV, LauncherConfig};
use crate::pipeline::Pipeline;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level filter, `None` for no logging.
    pub log_level: Option<String>,
    /// Hide progress bars and spinners.
    pub no_progress: bool,
    /// Explicit config file path.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load the configuration and build a pipeline from it.
    pub async fn pipeline(&self) -> Result<Pipeline> {
        let config = self.load_config().await?;
        Pipeline::new(config.into_context()?)
    }

    /// Load the configuration with environment overrides applied.
    pub async fn load_config(&self) -> Result<LauncherConfig> {
        LauncherConfig::load(self.config_path.as_deref()).await
    }
}

#[derive(Parser)]
#[command(
    name = "gamelaunch",
    about = "Install, update and launch the game from its GitHub releases",
    version,
    long_about = "gamelaunch keeps a local install in sync with the latest GitHub release of the game \
                  and starts it. Every update is a full reinstall; the installed version is recorded \
                  only after extraction succeeds."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an update is available
    Check(check::CheckCommand),

    /// Download and install a release asset
    Install(install::InstallCommand),

    /// Start the installed game
    Launch(launch::LaunchCommand),

    /// Update if needed, then launch
    Run(run::RunCommand),

    /// Show install location and installed version
    Status(status::StatusCommand),

    /// Show or initialize the configuration
    Config(config::ConfigCommand),
}

impl Cli {
    /// Initialize logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(config.log_level.as_deref());
        self.execute_with_config(config).await
    }

    /// Resolve global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => cmd.execute(&config).await,
            Commands::Install(cmd) => cmd.execute(&config).await,
            Commands::Launch(cmd) => cmd.execute(&config).await,
            Commands::Run(cmd) => cmd.execute(&config).await,
            Commands::Status(cmd) => cmd.execute(&config).await,
            Commands::Config(cmd) => cmd.execute(&config).await,
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `level` when set.
fn init_logging(level: Option<&str>) {
    let Some(level) = level else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gamelaunch_cli={level},gamelaunch={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
