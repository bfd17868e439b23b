//! `gamelaunch check`: compare the installed version with the latest release.

use super::CliConfig;
use crate::utils::progress::spinner_with_message;
use crate::version::UpdateStatus;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct CheckCommand {
    /// Print the result as JSON (`isUpToDate`, `latestVersion`, `localVersion`, `assetUrl`)
    #[arg(long)]
    json: bool,
}

impl CheckCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let pipeline = config.pipeline().await?;

        if self.json {
            // Failures are part of the JSON contract, not an exit status
            let check = pipeline.check_update().await;
            println!("{}", serde_json::to_string_pretty(&check)?);
            return Ok(());
        }

        let spinner = spinner_with_message("Checking for updates...", config.no_progress);
        let resolved = pipeline.resolve_status().await;
        spinner.finish_and_clear();
        let resolved = resolved?;

        let latest = &resolved.release.tag;
        match &resolved.status {
            UpdateStatus::UpToDate => {
                println!("{} {} ({})", "✓".green(), resolved.status, latest.cyan());
                return Ok(());
            }
            UpdateStatus::FreshInstall => {
                println!("{} {}: {} is available", "↓".yellow(), resolved.status, latest.cyan());
            }
            UpdateStatus::UpdateAvailable {
                from,
            } => {
                println!("{} {}: {} → {}", "↑".yellow(), resolved.status, from, latest.cyan());
            }
        }

        match &resolved.asset {
            Some(asset) => println!("  Asset: {} ({})", asset.name, asset.download_url.dimmed()),
            None => println!(
                "  {} no asset for {} in release {}",
                "warning:".yellow(),
                pipeline.context().platform,
                latest
            ),
        }
        Ok(())
    }
}

