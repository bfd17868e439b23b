//! `gamelaunch run`: check, install when outdated, then launch.

use super::CliConfig;
use super::install::download_with_progress;
use super::launch;
use crate::utils::progress::spinner_with_message;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::warn;

#[derive(Args)]
pub struct RunCommand {
    /// Skip the update check and launch whatever is installed
    #[arg(long)]
    offline: bool,
}

impl RunCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let pipeline = config.pipeline().await?;

        if !self.offline {
            let spinner = spinner_with_message("Checking for updates...", config.no_progress);
            let resolved = pipeline.resolve_status().await;
            spinner.finish_and_clear();
            let resolved = resolved?;

            if resolved.status.is_up_to_date() {
                println!("{} {} ({})", "✓".green(), resolved.status, resolved.release.tag.cyan());
            } else {
                match resolved.download_request() {
                    Some(request) => {
                        println!("{} {}: {}", "↓".yellow(), resolved.status, request.version.cyan());
                        download_with_progress(&pipeline, &request, config.no_progress).await?;
                    }
                    None if resolved.local_version.is_none() => {
                        return Err(resolved.no_asset_error(pipeline.context()).into());
                    }
                    None => {
                        warn!(
                            "Release {} has no {} asset, launching the installed version",
                            resolved.release.tag,
                            pipeline.context().platform
                        );
                    }
                }
            }
        }

        launch::report(&pipeline.launch_game().await);
        Ok(())
    }
}
