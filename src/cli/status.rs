//! `gamelaunch status`: on-disk layout and installed version.

use super::CliConfig;
use crate::version::VersionStore;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let context = config.load_config().await?.into_context()?;
        let local = VersionStore::new(&context.version_record_path).load().await;
        let installed = context.install_root.is_dir();

        println!("{}", "Launcher Status".bold());
        println!("  Repository:     {}", context.repository);
        println!("  Platform:       {}", context.platform);
        println!("  Install root:   {}", context.install_root.display());
        println!("  Version record: {}", context.version_record_path.display());
        match local {
            Some(version) => println!("  Installed:      {}", version.cyan()),
            None => println!("  Installed:      {}", "none".dimmed()),
        }
        if !installed {
            println!("  {}", "Install root does not exist".yellow());
        }
        Ok(())
    }
}
