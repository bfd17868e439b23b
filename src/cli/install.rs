//! `gamelaunch install`: download an asset and install it as a version.

use super::CliConfig;
use crate::download::progress_channel;
use crate::pipeline::{DownloadRequest, Pipeline};
use crate::utils::DownloadBar;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct InstallCommand {
    /// Asset download URL
    #[arg(long)]
    url: String,

    /// Release tag to record once the install succeeds
    #[arg(long = "version", value_name = "TAG")]
    tag: String,
}

impl InstallCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let pipeline = config.pipeline().await?;
        let request = DownloadRequest {
            url: self.url,
            version: self.tag,
        };

        download_with_progress(&pipeline, &request, config.no_progress).await?;

        println!("{} Installed {}", "✓".green(), request.version.cyan());
        Ok(())
    }
}

/// Run `download_game`, rendering its progress events on a bar.
pub(super) async fn download_with_progress(
    pipeline: &Pipeline,
    request: &DownloadRequest,
    no_progress: bool,
) -> Result<()> {
    let bar = DownloadBar::new(no_progress);
    bar.set_prefix(format!("Downloading {}", request.version));

    let (sender, mut receiver) = progress_channel();
    let render = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while let Some(progress) = receiver.recv().await {
                bar.update(&progress);
            }
        })
    };

    let result = pipeline.download_game(request, Some(sender)).await;
    // The sender is gone once download_game returns, so the task ends
    let _ = render.await;

    match &result {
        Ok(()) => bar.finish_and_clear(),
        Err(_) => bar.finish_with_message("failed".red().to_string()),
    }
    result
}
