//! `gamelaunch launch`: start the installed game.

use super::CliConfig;
use crate::launcher::LaunchOutcome;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct LaunchCommand {}

impl LaunchCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let pipeline = config.pipeline().await?;
        report(&pipeline.launch_game().await);
        Ok(())
    }
}

/// Print a launch outcome. Launching is best effort, so nothing here fails.
pub(super) fn report(outcome: &LaunchOutcome) {
    match outcome {
        LaunchOutcome::Started {
            path,
            pid,
        } => println!("{} Started {} (pid {})", "✓".green(), path.display(), pid),
        LaunchOutcome::NotFound => println!(
            "{} Nothing to launch. Install the game with 'gamelaunch run'",
            "✗".red()
        ),
        LaunchOutcome::Failed {
            reason,
        } => println!("{} Could not start the game: {}", "✗".red(), reason),
    }
}
