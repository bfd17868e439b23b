//! Latest-release resolution against the GitHub releases API.
//!
//! The launcher installs whatever the latest release of a single, fixed
//! repository is. [`ReleaseResolver::resolve`] fetches
//! `GET {api}/repos/{owner}/{repo}/releases/latest` and decodes the subset of
//! the payload the pipeline needs:
//!
//! ```json
//! { "tag_name": "v1.2.0",
//!   "assets": [ { "name": "game-win.zip", "browser_download_url": "https://..." } ] }
//! ```
//!
//! Asset selection is a pure function ([`select_asset`]): the first asset whose
//! name contains the platform keyword, compared case-insensitively. A release
//! without such an asset is a normal outcome (`None`), not an error.

use crate::config::RepositoryId;
use crate::constants::GITHUB_ACCEPT;
use crate::core::LauncherError;
use crate::platform::PlatformKind;
use anyhow::Result;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// File name as shown on the release page.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// The latest release of the configured repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRelease {
    /// Release tag, used verbatim as the version string.
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// Attached assets in API order.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl RemoteRelease {
    /// The asset to install on `platform`, if the release has one.
    #[must_use]
    pub fn asset_for(&self, platform: PlatformKind) -> Option<&Asset> {
        select_asset(&self.assets, platform)
    }
}

/// Pick the first asset whose name contains `platform`'s keyword (case-insensitive).
#[must_use]
pub fn select_asset(assets: &[Asset], platform: PlatformKind) -> Option<&Asset> {
    let keyword = platform.asset_keyword();
    assets.iter().find(|asset| asset.name.to_lowercase().contains(keyword))
}

/// Queries the release index of one repository.
#[derive(Debug, Clone)]
pub struct ReleaseResolver {
    client: reqwest::Client,
    api_base_url: String,
    repository: RepositoryId,
}

impl ReleaseResolver {
    /// Create a resolver for `repository` using `client` for requests.
    pub fn new(
        client: reqwest::Client,
        api_base_url: impl Into<String>,
        repository: RepositoryId,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into(),
            repository,
        }
    }

    /// URL of the latest-release endpoint.
    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base_url.trim_end_matches('/'),
            self.repository.owner,
            self.repository.name
        )
    }

    /// Fetch the latest release.
    ///
    /// # Errors
    ///
    /// [`LauncherError::NetworkError`] when the request or body decoding fails,
    /// [`LauncherError::HttpStatus`] for non-success responses.
    pub async fn resolve(&self) -> Result<RemoteRelease> {
        let url = self.latest_release_url();
        debug!("Fetching latest release from {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|e| LauncherError::network("fetch latest release", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::HttpStatus {
                url,
                status: status.as_u16(),
            }
            .into());
        }

        let release: RemoteRelease = response
            .json()
            .await
            .map_err(|e| LauncherError::network("decode latest release", &e))?;

        info!(
            "Latest release of {} is {} ({} asset(s))",
            self.repository,
            release.tag,
            release.assets.len()
        );
        Ok(release)
    }
}
