//! Streaming asset download with progress events.
//!
//! The body is streamed chunk by chunk into the archive file, written exactly
//! once from start to end. There is no resume, range request, cancellation, or
//! timeout beyond what the HTTP client enforces.
//!
//! Progress is published on a typed channel rather than through callbacks. The
//! subscriber owns the receiving end; sends are fire-and-forget, so a slow or
//! dropped receiver never stalls the download. One event is published per
//! received chunk, with no batching, and only when the server announced a
//! total length. Without a `Content-Length` nothing is published.
//!
//! ```rust,no_run
//! use gamelaunch_cli::download::{Downloader, progress_channel};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (tx, mut rx) = progress_channel();
//! let downloader = Downloader::new(reqwest::Client::new()).with_progress(tx);
//!
//! let watcher = tokio::spawn(async move {
//!     while let Some(p) = rx.recv().await {
//!         println!("{}%", p.percent);
//!     }
//! });
//!
//! downloader.download("https://example.com/game-win.zip", Path::new("update.zip")).await?;
//! drop(downloader);
//! watcher.await?;
//! # Ok(())
//! # }
//! ```

use crate::core::LauncherError;
use anyhow::{Context, Result};
use futures::StreamExt;
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

/// One progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    /// Bytes received so far.
    pub bytes_received: u64,
    /// Total bytes announced by the server.
    pub bytes_total: Option<u64>,
    /// `floor(bytes_received / bytes_total * 100)`, capped at 100.
    pub percent: u8,
}

impl DownloadProgress {
    /// Build an event, or `None` when the total is unknown.
    #[must_use]
    pub fn new(bytes_received: u64, bytes_total: Option<u64>) -> Option<Self> {
        let total = bytes_total?;
        Some(Self {
            bytes_received,
            bytes_total: Some(total),
            percent: percent_of(bytes_received, total),
        })
    }
}

/// Integer percentage, floored and capped at 100. A zero total counts as done.
#[must_use]
pub fn percent_of(received: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = u128::from(received) * 100 / u128::from(total);
    percent.min(100) as u8
}

/// Sender half of a progress channel.
pub type ProgressSender = UnboundedSender<DownloadProgress>;

/// Create a progress channel for [`Downloader::with_progress`].
#[must_use]
pub fn progress_channel() -> (ProgressSender, UnboundedReceiver<DownloadProgress>) {
    unbounded_channel()
}

/// Streams a URL to a file.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    progress: Option<ProgressSender>,
}

impl Downloader {
    /// Create a downloader without a progress subscriber.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            progress: None,
        }
    }

    /// Publish progress events to `sender`.
    #[must_use]
    pub fn with_progress(mut self, sender: ProgressSender) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Download `url` into `dest`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Network failures (connect, non-success status, broken stream) are
    /// reported as [`LauncherError::NetworkError`] / [`LauncherError::HttpStatus`];
    /// write failures as [`LauncherError::IoError`] with the destination path attached.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {} -> {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LauncherError::network("download asset", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let total = response.content_length();
        match total {
            Some(total) => debug!("Download size: {} bytes", total),
            None => debug!("Download size unknown, progress will not be reported"),
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(LauncherError::from)
            .with_context(|| format!("Failed to create archive file: {}", dest.display()))?;

        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LauncherError::network("download asset", &e))?;

            file.write_all(&chunk)
                .await
                .map_err(LauncherError::from)
                .with_context(|| format!("Failed to write archive file: {}", dest.display()))?;

            received += chunk.len() as u64;
            self.publish(received, total);
        }

        file.flush()
            .await
            .map_err(LauncherError::from)
            .with_context(|| format!("Failed to flush archive file: {}", dest.display()))?;

        info!("Downloaded {} bytes to {}", received, dest.display());
        Ok(received)
    }

    fn publish(&self, received: u64, total: Option<u64>) {
        if let (Some(sender), Some(progress)) = (&self.progress, DownloadProgress::new(received, total)) {
            // Receiver may be gone; progress is advisory
            let _ = sender.send(progress);
        }
    }
}
