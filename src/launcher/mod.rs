//! Starting the installed game.
//!
//! Launching is best effort. A missing entry point is logged and reported as
//! [`LaunchOutcome::NotFound`] rather than an error, so the caller keeps
//! running and the user can retry (typically after reinstalling).

use crate::core::LauncherError;
use crate::platform::{PlatformCapability, PlatformKind};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened when the launcher tried to start the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LaunchOutcome {
    /// The entry point was started as a detached process.
    Started {
        /// Entry point that was started.
        path: PathBuf,
        /// Child process id.
        pid: u32,
    },
    /// No entry point exists under the install root.
    NotFound,
    /// The entry point exists but could not be started.
    Failed {
        /// Why the spawn failed.
        reason: String,
    },
}

impl LaunchOutcome {
    /// Whether control was handed off to the game.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }
}

/// Locates and starts the installed entry point.
#[derive(Clone)]
pub struct Launcher {
    install_root: PathBuf,
    capability: Arc<dyn PlatformCapability>,
}

impl Launcher {
    pub fn new(install_root: impl Into<PathBuf>, capability: Arc<dyn PlatformCapability>) -> Self {
        Self {
            install_root: install_root.into(),
            capability,
        }
    }

    /// Locate the entry point and start it detached.
    ///
    /// On MacOS the permission repair from installation is applied again
    /// first; a failing repair is logged and the launch is still attempted.
    ///
    /// # Errors
    ///
    /// [`LauncherError::LaunchFailed`] when the entry point exists but the
    /// process could not be spawned.
    pub fn launch(&self) -> Result<LaunchOutcome> {
        let kind = self.capability.kind();

        let Some(entry_point) = self.capability.locate_entry_point(&self.install_root) else {
            let err = LauncherError::LaunchNotFound {
                root: self.install_root.display().to_string(),
                extension: kind.entry_extension().to_string(),
            };
            error!("{}", err);
            return Ok(LaunchOutcome::NotFound);
        };

        if kind == PlatformKind::MacOs {
            if let Err(e) = self.capability.repair_permissions(&self.install_root) {
                warn!("Permission repair before launch failed: {:#}", e);
            }
        }

        info!("Launching {}", entry_point.display());
        let pid = self.capability.start_detached(&entry_point)?;

        Ok(LaunchOutcome::Started {
            path: entry_point,
            pid,
        })
    }
}
