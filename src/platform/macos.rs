use super::{PlatformCapability, PlatformKind};
use crate::constants::{EXECUTABLE_MODE, MACOS_PAYLOAD_DIR};
use crate::core::LauncherError;
use crate::locator::ExecutableLocator;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// MacOS installs: `.app` bundles that need quarantine and mode repair.
#[derive(Debug, Clone)]
pub struct MacOsPlatform {
    xattr_program: String,
}

impl Default for MacOsPlatform {
    fn default() -> Self {
        Self {
            xattr_program: "xattr".to_string(),
        }
    }
}

impl MacOsPlatform {
    /// Use a different program to clear extended attributes.
    #[must_use]
    pub fn with_xattr_program(mut self, program: impl Into<String>) -> Self {
        self.xattr_program = program.into();
        self
    }

    /// Recursively clear extended attributes (including `com.apple.quarantine`).
    ///
    /// Best effort: the bundle is often launchable anyway, so every failure is
    /// logged and swallowed.
    pub fn clear_quarantine(&self, bundle: &Path) {
        let program = match which::which(&self.xattr_program) {
            Ok(program) => program,
            Err(e) => {
                warn!("Cannot clear quarantine on {}: {} not available ({})", bundle.display(), self.xattr_program, e);
                return;
            }
        };

        match Command::new(program).arg("-rc").arg(bundle).stdin(Stdio::null()).output() {
            Ok(output) if output.status.success() => {
                debug!("Cleared extended attributes on {}", bundle.display());
            }
            Ok(output) => warn!(
                "Clearing quarantine on {} exited with {}: {}",
                bundle.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("Failed to run {} on {}: {}", self.xattr_program, bundle.display(), e),
        }
    }

    /// Set mode 755 on every non-hidden file directly inside the bundle payload dir.
    ///
    /// Returns the number of files updated. A bundle without a payload dir is
    /// left alone.
    pub fn make_payload_executable(&self, bundle: &Path) -> Result<usize> {
        let payload = MACOS_PAYLOAD_DIR.iter().fold(bundle.to_path_buf(), |p, c| p.join(c));
        if !payload.is_dir() {
            debug!("No payload directory at {}", payload.display());
            return Ok(0);
        }

        let entries = std::fs::read_dir(&payload)
            .with_context(|| format!("Failed to read payload directory: {}", payload.display()))?;

        let mut updated = 0;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read payload directory: {}", payload.display()))?;

            // OS bookkeeping files (.DS_Store and friends)
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            set_executable(&path)?;
            updated += 1;
        }

        debug!("Marked {} payload file(s) executable in {}", updated, bundle.display());
        Ok(updated)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE)).map_err(|e| {
        LauncherError::PermissionRepairFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(not(unix))]
fn set_executable(path: &Path) -> Result<()> {
    debug!("Skipping mode {:o} on {} (not a unix host)", EXECUTABLE_MODE, path.display());
    Ok(())
}

impl PlatformCapability for MacOsPlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::MacOs
    }

    fn locate_entry_point(&self, install_root: &Path) -> Option<PathBuf> {
        ExecutableLocator::find(install_root, PlatformKind::MacOs.entry_extension())
    }

    fn repair_permissions(&self, install_root: &Path) -> Result<()> {
        let Some(bundle) = self.locate_entry_point(install_root) else {
            warn!("No application bundle under {}, skipping permission repair", install_root.display());
            return Ok(());
        };

        self.clear_quarantine(&bundle);
        self.make_payload_executable(&bundle)?;
        Ok(())
    }

    fn start_detached(&self, entry_point: &Path) -> Result<u32> {
        let mut command = Command::new("open");
        command.arg(entry_point).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| LauncherError::LaunchFailed {
            path: entry_point.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Opened {} (pid {})", entry_point.display(), child.id());
        Ok(child.id())
    }
}
