//! Persisted local version record.
//!
//! The launcher remembers which release is installed in a single JSON file,
//! `{"version": "<tag>"}`, stored beside the install root so it survives the
//! root being wiped and recreated on every install.
//!
//! Reading is forgiving: a missing, unreadable, or unparsable record means
//! "no local version" and simply leads to a fresh install. Writing is atomic
//! (temp file + rename), so a crash mid-write never leaves a half-written
//! record behind.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gamelaunch_cli::version::VersionStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = VersionStore::new("data/version.json");
//! if store.load().await.is_none() {
//!     println!("nothing installed yet");
//! }
//! store.save("v1.2.0").await?;
//! # Ok(())
//! # }
//! ```

pub mod comparison;

pub use comparison::UpdateStatus;

use crate::utils::fs::atomic_write;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of the version record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVersionRecord {
    /// Release tag of the installed build.
    pub version: String,
}

/// Reads and writes the version record file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Path of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the installed version.
    ///
    /// Returns `None` when the record is absent, unreadable, unparsable, or
    /// holds an empty version string.
    pub async fn load(&self) -> Option<String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No version record at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<LocalVersionRecord>(&content) {
            Ok(record) if !record.version.is_empty() => Some(record.version),
            Ok(_) => {
                debug!("Version record at {} is empty", self.path.display());
                None
            }
            Err(e) => {
                debug!("Ignoring unparsable version record at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Persist `version` as the installed version.
    pub async fn save(&self, version: &str) -> Result<()> {
        let record = LocalVersionRecord {
            version: version.to_string(),
        };
        let content =
            serde_json::to_vec(&record).context("Failed to serialize version record")?;

        atomic_write(&self.path, &content)
            .await
            .with_context(|| format!("Failed to write version record: {}", self.path.display()))?;

        debug!("Recorded installed version {} at {}", version, self.path.display());
        Ok(())
    }
}
