//! `gamelaunch config`: show or initialize the configuration file.

use super::CliConfig;
use crate::config::LauncherConfig;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the resolved configuration (file + environment overrides)
    Show,

    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(config).await,
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(config, force).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", LauncherConfig::resolve_path(config.config_path.as_deref())?.display());
                Ok(())
            }
        }
    }

    async fn show(config: &CliConfig) -> Result<()> {
        let path = LauncherConfig::resolve_path(config.config_path.as_deref())?;
        let launcher_config = config.load_config().await?;

        println!("{}", "Launcher Configuration".bold());
        if path.exists() {
            println!("Location: {}\n", path.display());
        } else {
            println!("Location: {} {}\n", path.display(), "(not present, using defaults)".dimmed());
        }
        println!("{}", toml::to_string_pretty(&launcher_config)?);

        match launcher_config.resolved_data_dir() {
            Ok(dir) => println!("{} {}", "Data directory:".bold(), dir.display()),
            Err(e) => println!("{} {}", "Data directory:".bold(), e.to_string().red()),
        }
        Ok(())
    }

    async fn init(config: &CliConfig, force: bool) -> Result<()> {
        let path = LauncherConfig::resolve_path(config.config_path.as_deref())?;

        if path.exists() && !force {
            println!("{} Config already exists at: {}", "✗".red(), path.display());
            println!("  Use --force to overwrite");
            return Ok(());
        }

        LauncherConfig::default().save_to(&path).await?;
        println!("{} Created config at: {}", "✓".green(), path.display());
        Ok(())
    }
}
