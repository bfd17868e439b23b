//! The three operations the front end drives: check, download+install, launch.
//!
//! [`Pipeline`] owns the resolved [`LaunchContext`], one HTTP client and the
//! platform capability selected at startup. Callers issue one operation at a
//! time and await it before the next; the pipeline does no locking of its own.
//!
//! ```text
//! check_update ── ReleaseResolver ──▶ compare with VersionStore ──▶ UpdateCheck
//! download_game ─ Downloader (progress) ──▶ Installer ──▶ version record
//! launch_game ─── Launcher (locate, repair on MacOS, start detached)
//! ```

use crate::config::LaunchContext;
use crate::constants::CONNECTION_FAILED_MESSAGE;
use crate::core::{LauncherError, find_launcher_error};
use crate::download::{Downloader, ProgressSender};
use crate::installer::Installer;
use crate::launcher::{LaunchOutcome, Launcher};
use crate::platform::{PlatformCapability, capability_for};
use crate::release::{Asset, ReleaseResolver, RemoteRelease};
use crate::utils::fs::{ensure_dir, remove_file};
use crate::version::{UpdateStatus, VersionStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Arguments of [`Pipeline::download_game`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Asset download URL.
    pub url: String,
    /// Release tag recorded after a successful install.
    pub version: String,
}

/// Successful result of [`Pipeline::check_update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub is_up_to_date: bool,
    pub latest_version: String,
    pub local_version: Option<String>,
    /// `None` when the release has no asset for this platform.
    pub asset_url: Option<String>,
}

impl UpdateReport {
    /// The comparison state behind `is_up_to_date`.
    #[must_use]
    pub fn status(&self) -> UpdateStatus {
        UpdateStatus::compare(self.local_version.as_deref(), &self.latest_version)
    }
}

/// Failed result of [`Pipeline::check_update`]. `error` is always `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub error: bool,
    pub message: String,
}

/// Result of [`Pipeline::check_update`], serialized without a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdateCheck {
    Report(UpdateReport),
    Failed(CheckFailure),
}

impl UpdateCheck {
    fn failure(error: &anyhow::Error) -> Self {
        let message = match find_launcher_error(error) {
            Some(e) if e.is_network() => CONNECTION_FAILED_MESSAGE.to_string(),
            _ => format!("{error:#}"),
        };
        Self::Failed(CheckFailure {
            error: true,
            message,
        })
    }
}

/// A resolved release compared against the local install.
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    pub release: RemoteRelease,
    pub local_version: Option<String>,
    pub status: UpdateStatus,
    /// Asset for the configured platform, if the release ships one.
    pub asset: Option<Asset>,
}

impl ResolvedRelease {
    /// The request that installs this release, or `None` without a compatible asset.
    #[must_use]
    pub fn download_request(&self) -> Option<DownloadRequest> {
        self.asset.as_ref().map(|asset| DownloadRequest {
            url: asset.download_url.clone(),
            version: self.release.tag.clone(),
        })
    }

    /// [`LauncherError::NoCompatibleAsset`] for this release.
    #[must_use]
    pub fn no_asset_error(&self, context: &LaunchContext) -> LauncherError {
        LauncherError::NoCompatibleAsset {
            platform: context.platform.to_string(),
            tag: self.release.tag.clone(),
        }
    }

    fn report(&self) -> UpdateReport {
        UpdateReport {
            is_up_to_date: self.status.is_up_to_date(),
            latest_version: self.release.tag.clone(),
            local_version: self.local_version.clone(),
            asset_url: self.asset.as_ref().map(|a| a.download_url.clone()),
        }
    }
}

/// Entry points of the update pipeline.
pub struct Pipeline {
    context: LaunchContext,
    client: reqwest::Client,
    capability: Arc<dyn PlatformCapability>,
}

impl Pipeline {
    /// Build a pipeline with the capability of the configured platform.
    pub fn new(context: LaunchContext) -> Result<Self> {
        let capability = capability_for(context.platform);
        Self::with_capability(context, capability)
    }

    /// Build a pipeline with an explicit platform capability.
    pub fn with_capability(
        context: LaunchContext,
        capability: Arc<dyn PlatformCapability>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&context.user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            context,
            client,
            capability,
        })
    }

    #[must_use]
    pub fn context(&self) -> &LaunchContext {
        &self.context
    }

    fn version_store(&self) -> VersionStore {
        VersionStore::new(&self.context.version_record_path)
    }

    /// Installed version, if any.
    pub async fn local_version(&self) -> Option<String> {
        self.version_store().load().await
    }

    /// Resolve the latest release and compare it with the local record.
    ///
    /// A release without a compatible asset is not an error here; callers
    /// inspect [`ResolvedRelease::asset`].
    pub async fn resolve_status(&self) -> Result<ResolvedRelease> {
        let resolver = ReleaseResolver::new(
            self.client.clone(),
            &self.context.api_base_url,
            self.context.repository.clone(),
        );
        let release = resolver.resolve().await?;
        let local_version = self.local_version().await;
        let status = UpdateStatus::compare(local_version.as_deref(), &release.tag);
        let asset = release.asset_for(self.context.platform).cloned();

        if asset.is_none() {
            warn!("Release {} has no {} asset", release.tag, self.context.platform);
        }
        debug!("Local {:?}, remote {}: {}", local_version, release.tag, status);

        Ok(ResolvedRelease {
            release,
            local_version,
            status,
            asset,
        })
    }

    /// `checkUpdate`: never fails, errors are folded into [`UpdateCheck::Failed`].
    pub async fn check_update(&self) -> UpdateCheck {
        match self.resolve_status().await {
            Ok(resolved) => UpdateCheck::Report(resolved.report()),
            Err(e) => {
                warn!("Update check failed: {:#}", e);
                UpdateCheck::failure(&e)
            }
        }
    }

    /// `downloadGame`: download the asset, then install it as `request.version`.
    ///
    /// Progress events go to `progress` while the body streams; the sender is
    /// dropped before installation starts, which closes the channel.
    ///
    /// # Errors
    ///
    /// Network errors from the download, IO errors from the install. In both
    /// cases the version record keeps its previous value.
    pub async fn download_game(
        &self,
        request: &DownloadRequest,
        progress: Option<ProgressSender>,
    ) -> Result<()> {
        let archive = &self.context.archive_path;
        ensure_dir(&self.context.data_dir).await.with_context(|| {
            LauncherError::FileSystemError {
                operation: "create data directory".to_string(),
                path: self.context.data_dir.display().to_string(),
            }
        })?;

        {
            let mut downloader = Downloader::new(self.client.clone());
            if let Some(sender) = progress {
                downloader = downloader.with_progress(sender);
            }

            if let Err(e) = downloader.download(&request.url, archive).await {
                if let Err(cleanup) = remove_file(archive).await {
                    warn!("Could not remove partial archive: {:#}", cleanup);
                }
                return Err(e);
            }
        }

        let installer = Installer::new(
            &self.context.install_root,
            self.version_store(),
            Arc::clone(&self.capability),
        );
        installer.install(archive, &request.version).await?;

        info!("{} is installed", request.version);
        Ok(())
    }

    /// `launchGame`: best effort, failures are logged and returned as an outcome.
    pub async fn launch_game(&self) -> LaunchOutcome {
        let launcher = Launcher::new(&self.context.install_root, Arc::clone(&self.capability));

        let result = tokio::task::spawn_blocking(move || launcher.launch()).await;
        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("Launch failed: {:#}", e);
                LaunchOutcome::Failed {
                    reason: format!("{e:#}"),
                }
            }
            Err(e) => {
                error!("Launch task failed: {}", e);
                LaunchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
