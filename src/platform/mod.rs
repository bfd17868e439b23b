//! Platform-specific behavior of the launcher.
//!
//! All branching on the operating system is consolidated behind the
//! [`PlatformCapability`] trait. Exactly one implementation is selected at
//! startup from the configured [`PlatformKind`] and shared by the installer and
//! the launcher:
//!
//! | Capability | Windows | MacOS |
//! |---|---|---|
//! | `locate_entry_point` | first `.exe` that is not a crash handler | first `.app` bundle |
//! | `repair_permissions` | no-op | clear quarantine, chmod 755 the bundle payload |
//! | `start_detached` | spawn the exe in its own directory | `open <bundle>` |
//!
//! Selection is keyed on the configured kind rather than `cfg!(target_os)`, so
//! the MacOS repair logic can run (and be tested) on any unix host.

mod macos;
mod windows;

pub use macos::MacOsPlatform;
pub use windows::WindowsPlatform;

use crate::constants::{
    MACOS_ASSET_KEYWORD, MACOS_BUNDLE_EXTENSION, WINDOWS_ASSET_KEYWORD,
    WINDOWS_EXECUTABLE_EXTENSION,
};
use crate::core::LauncherError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// The platforms the launcher can install for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Windows: `.exe` entry points.
    Windows,
    /// MacOS: `.app` bundles.
    MacOs,
}

impl PlatformKind {
    /// Detect the platform of the running host.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::PlatformNotSupported`] on anything other than
    /// Windows or MacOS.
    pub fn detect() -> Result<Self, LauncherError> {
        if cfg!(target_os = "windows") {
            Ok(Self::Windows)
        } else if cfg!(target_os = "macos") {
            Ok(Self::MacOs)
        } else {
            Err(LauncherError::PlatformNotSupported {
                platform: std::env::consts::OS.to_string(),
            })
        }
    }

    /// Keyword that must appear in a release asset name for this platform.
    #[must_use]
    pub const fn asset_keyword(self) -> &'static str {
        match self {
            Self::Windows => WINDOWS_ASSET_KEYWORD,
            Self::MacOs => MACOS_ASSET_KEYWORD,
        }
    }

    /// Extension of the runnable entry point on this platform.
    #[must_use]
    pub const fn entry_extension(self) -> &'static str {
        match self {
            Self::Windows => WINDOWS_EXECUTABLE_EXTENSION,
            Self::MacOs => MACOS_BUNDLE_EXTENSION,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::MacOs => write!(f, "MacOS"),
        }
    }
}

impl FromStr for PlatformKind {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "macos" | "mac" | "darwin" => Ok(Self::MacOs),
            other => Err(LauncherError::ConfigError {
                message: format!("unknown platform '{other}' (expected 'windows' or 'macos')"),
            }),
        }
    }
}

/// The per-platform operations used by the installer and the launcher.
pub trait PlatformCapability: Send + Sync {
    /// Which platform this implementation serves.
    fn kind(&self) -> PlatformKind;

    /// Find the runnable entry point under `install_root`, if any.
    fn locate_entry_point(&self, install_root: &Path) -> Option<PathBuf>;

    /// Make the installed files runnable.
    ///
    /// Must be idempotent: it runs after every install and again before every
    /// launch.
    fn repair_permissions(&self, install_root: &Path) -> Result<()>;

    /// Start `entry_point` as a detached process and return its pid.
    ///
    /// The child is never waited on; its lifetime is independent of the launcher.
    fn start_detached(&self, entry_point: &Path) -> Result<u32>;
}

/// Select the capability implementation for `kind`.
#[must_use]
pub fn capability_for(kind: PlatformKind) -> Arc<dyn PlatformCapability> {
    match kind {
        PlatformKind::Windows => Arc::new(WindowsPlatform),
        PlatformKind::MacOs => Arc::new(MacOsPlatform::default()),
    }
}
