use super::{PlatformCapability, PlatformKind};
use crate::core::LauncherError;
use crate::locator::ExecutableLocator;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// `DETACHED_PROCESS`: the child gets no console of its own from the launcher.
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
/// `CREATE_NEW_PROCESS_GROUP`: the child ignores Ctrl+C sent to the launcher.
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Windows installs: `.exe` entry points, no permission repair.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPlatform;

impl PlatformCapability for WindowsPlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn locate_entry_point(&self, install_root: &Path) -> Option<PathBuf> {
        ExecutableLocator::find(install_root, PlatformKind::Windows.entry_extension())
    }

    fn repair_permissions(&self, _install_root: &Path) -> Result<()> {
        debug!("No permission repair needed on Windows");
        Ok(())
    }

    fn start_detached(&self, entry_point: &Path) -> Result<u32> {
        let mut command = Command::new(entry_point);

        // Games load sibling resources relative to the working directory
        if let Some(dir) = entry_point.parent() {
            command.current_dir(dir);
        }
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| LauncherError::LaunchFailed {
            path: entry_point.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Started {} (pid {})", entry_point.display(), child.id());
        Ok(child.id())
    }
}
