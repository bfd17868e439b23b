//! Installation of a downloaded release archive.
//!
//! Every install is a full reinstall. The sequence below is strictly ordered;
//! each step is a precondition for the next:
//!
//! ```text
//! 1. wipe      remove the whole install root (no merging with old files)
//! 2. recreate  create an empty install root
//! 3. extract   unpack every archive entry into the root
//! 4. cleanup   delete the temporary archive
//! 5. record    write the version record
//! 6. repair    platform permission repair (MacOS bundles only)
//! ```
//!
//! The version record is written only after extraction succeeded. Any failure
//! in steps 1-4 leaves the previous record (or its absence) untouched, so the
//! next check still reports an update and forces a retry. When extraction
//! fails partway, the half-populated root is removed again so the root is
//! either a complete install or absent, never a mixture.
//!
//! Only one install may run at a time. The caller guarantees this by issuing a
//! single pipeline operation at a time; the installer does no locking of its own.

mod extract;

pub use extract::extract_zip;

use crate::core::LauncherError;
use crate::platform::PlatformCapability;
use crate::utils::fs::{ensure_dir, remove_dir_all, remove_file};
use crate::version::VersionStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Replaces the install root with the contents of a release archive.
pub struct Installer {
    install_root: PathBuf,
    version_store: VersionStore,
    capability: Arc<dyn PlatformCapability>,
}

impl Installer {
    /// Create an installer for `install_root`.
    pub fn new(
        install_root: impl Into<PathBuf>,
        version_store: VersionStore,
        capability: Arc<dyn PlatformCapability>,
    ) -> Self {
        Self {
            install_root: install_root.into(),
            version_store,
            capability,
        }
    }

    /// Install `archive_path` as `version`.
    ///
    /// # Errors
    ///
    /// IO-category [`LauncherError`]s: `FileSystemError` for the wipe, recreate,
    /// and cleanup steps, `ExtractionFailed` for a broken archive, and
    /// `PermissionRepairFailed` when bundle modes cannot be set.
    pub async fn install(&self, archive_path: &Path, version: &str) -> Result<()> {
        info!("Installing {} into {}", version, self.install_root.display());

        if self.install_root.exists() {
            debug!("Removing previous install at {}", self.install_root.display());
            remove_dir_all(&self.install_root)
                .await
                .with_context(|| self.fs_error("remove install root", &self.install_root))?;
        }

        ensure_dir(&self.install_root)
            .await
            .with_context(|| self.fs_error("create install root", &self.install_root))?;

        let archive = archive_path.to_path_buf();
        let root = self.install_root.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_zip(&archive, &root))
            .await
            .context("Extraction task failed")?;

        let entries = match extracted {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Extraction failed, removing partial install: {}", e);
                if let Err(cleanup) = remove_dir_all(&self.install_root).await {
                    warn!("Could not remove partial install: {:#}", cleanup);
                }
                return Err(e.into());
            }
        };
        debug!("Extracted {} entries", entries);

        remove_file(archive_path)
            .await
            .with_context(|| self.fs_error("delete downloaded archive", archive_path))?;

        self.version_store
            .save(version)
            .await
            .with_context(|| self.fs_error("write version record", self.version_store.path()))?;

        self.repair_permissions().await?;

        info!("Installed {}", version);
        Ok(())
    }

    /// Run the platform permission repair on the install root.
    pub async fn repair_permissions(&self) -> Result<()> {
        let capability = Arc::clone(&self.capability);
        let root = self.install_root.clone();
        tokio::task::spawn_blocking(move || capability.repair_permissions(&root))
            .await
            .context("Permission repair task failed")?
    }

    fn fs_error(&self, operation: &str, path: &Path) -> LauncherError {
        LauncherError::FileSystemError {
            operation: operation.to_string(),
            path: path.display().to_string(),
        }
    }
}
