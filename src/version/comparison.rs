//! Local-versus-remote comparison.
//!
//! Tags are opaque labels: the local install is current only when its recorded
//! tag is byte-for-byte equal to the latest release tag. There is no semver
//! ordering, so a differently-labeled or even "newer" local tag still counts as
//! needing an update.

use serde::Serialize;
use std::fmt;

/// Result of comparing the local record against the latest release tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum UpdateStatus {
    /// The recorded version equals the latest tag.
    UpToDate,
    /// Nothing is recorded locally.
    FreshInstall,
    /// A different version is recorded.
    UpdateAvailable {
        /// The currently recorded version
        from: String,
    },
}

impl UpdateStatus {
    /// Compare `local` against `latest_tag`.
    ///
    /// Empty strings never count as up to date.
    #[must_use]
    pub fn compare(local: Option<&str>, latest_tag: &str) -> Self {
        match local {
            None | Some("") => Self::FreshInstall,
            Some(local) if !latest_tag.is_empty() && local == latest_tag => Self::UpToDate,
            Some(local) => Self::UpdateAvailable {
                from: local.to_string(),
            },
        }
    }

    /// Whether no download is needed.
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }

    /// Short headline for the UI.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::UpToDate => "Game is up to date",
            Self::FreshInstall => "Install the game",
            Self::UpdateAvailable { .. } => "Update available",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}
