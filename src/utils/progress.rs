//! Terminal progress rendering for downloads.
//!
//! Wraps `indicatif` so the CLI can turn [`DownloadProgress`] events into a
//! progress bar. When progress is disabled (`--no-progress`) the bar is hidden
//! but still accepts updates, so callers never branch on it.

use crate::download::DownloadProgress;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Progress bar for a single asset download.
#[derive(Clone)]
pub struct DownloadBar {
    inner: IndicatifBar,
}

impl DownloadBar {
    /// Create a percentage bar, hidden when `hidden` is set.
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        let bar = if hidden {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(100);
            bar.set_style(percent_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Set the label shown before the bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Apply one progress event.
    pub fn update(&self, progress: &DownloadProgress) {
        self.inner.set_position(u64::from(progress.percent));
        if let Some(total) = progress.bytes_total {
            self.inner.set_message(format!(
                "{} / {}",
                indicatif::HumanBytes(progress.bytes_received),
                indicatif::HumanBytes(total)
            ));
        }
    }

    /// Finish with a final message.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Current position (percent).
    #[must_use]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }
}

fn percent_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

/// Spinner used while waiting on the release index.
#[must_use]
pub fn spinner_with_message(msg: impl Into<String>, hidden: bool) -> IndicatifBar {
    if hidden {
        return IndicatifBar::hidden();
    }

    let spinner = IndicatifBar::new_spinner();
    if let Ok(style) = IndicatifStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]));
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(msg.into());
    spinner
}
