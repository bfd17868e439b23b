//! gamelaunch CLI entry point
//!
//! Parses arguments, runs the selected command, and turns failures into a
//! colored error report with an exit status of 1.

use anyhow::Result;
use clap::Parser;
use gamelaunch_cli::cli;
use gamelaunch_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
