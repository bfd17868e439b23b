//! Launcher configuration and the per-process launch context.
//!
//! Settings come from an optional TOML file, then environment overrides, and
//! are resolved once at startup into an immutable [`LaunchContext`] that every
//! pipeline operation receives explicitly. Nothing here is global state.
//!
//! # Configuration File Location
//!
//! 1. `--config <path>` on the command line
//! 2. `GAMELAUNCH_CONFIG` environment variable
//! 3. `<config dir>/gamelaunch/config.toml` (`~/.config` on Linux,
//!    `~/Library/Application Support` on MacOS, `%APPDATA%` on Windows)
//!
//! A missing file is not an error; every key has a default.
//!
//! # File Format
//!
//! ```toml
//! repository = "J3YCEN/project_alpha_releases"
//! api_base_url = "https://api.github.com"
//! data_dir = "~/Games/ProjectAlpha"
//! install_dir_name = "Game"
//! version_file_name = "version.json"
//! archive_file_name = "update.zip"
//! platform = "macos"          # optional, detected when absent
//! ```
//!
//! # Environment Overrides
//!
//! - `GAMELAUNCH_REPOSITORY`: repository as `owner/name`
//! - `GAMELAUNCH_DATA_DIR`: data directory (install root parent)
//! - `GAMELAUNCH_API_URL`: release API base URL

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE_URL, DEFAULT_ARCHIVE_FILE_NAME,
    DEFAULT_INSTALL_DIR_NAME, DEFAULT_REPOSITORY, DEFAULT_VERSION_FILE_NAME,
};
use crate::core::LauncherError;
use crate::platform::PlatformKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::debug;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GAMELAUNCH_CONFIG";
/// Environment override for [`LauncherConfig::repository`].
pub const REPOSITORY_ENV: &str = "GAMELAUNCH_REPOSITORY";
/// Environment override for [`LauncherConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "GAMELAUNCH_DATA_DIR";
/// Environment override for [`LauncherConfig::api_base_url`].
pub const API_URL_ENV: &str = "GAMELAUNCH_API_URL";

/// A GitHub repository identifier, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    /// Account or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for RepositoryId {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LauncherError::ConfigError {
            message: format!("repository '{s}' must look like 'owner/name'"),
        };

        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        let valid_part = |part: &str| {
            !part.is_empty() && !part.contains('/') && !part.chars().any(char::is_whitespace)
        };
        if !valid_part(owner) || !valid_part(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// User-editable launcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Repository whose latest release is installed, `owner/name`.
    pub repository: String,

    /// Base URL of the release API.
    pub api_base_url: String,

    /// Directory holding the install root, the version record and the
    /// downloaded archive. `~` and `$VARS` are expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Name of the install root inside the data directory.
    pub install_dir_name: String,

    /// Name of the version record inside the data directory.
    pub version_file_name: String,

    /// Name of the temporary archive inside the data directory.
    pub archive_file_name: String,

    /// Platform override; the host is detected when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformKind>,

    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: None,
            install_dir_name: DEFAULT_INSTALL_DIR_NAME.to_string(),
            version_file_name: DEFAULT_VERSION_FILE_NAME.to_string(),
            archive_file_name: DEFAULT_ARCHIVE_FILE_NAME.to_string(),
            platform: None,
            user_agent: format!("{}/{}", APP_DIR_NAME, env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LauncherConfig {
    /// Load the configuration and apply environment overrides.
    ///
    /// `explicit` is the `--config` path; when `None` the `GAMELAUNCH_CONFIG`
    /// variable and then the default location are used. A missing file yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit)?;
        let mut config = if path.exists() {
            Self::load_from(&path).await?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific TOML file, without env overrides.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write this configuration as TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// The config file path: `explicit`, else `GAMELAUNCH_CONFIG`, else the default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// `<config dir>/gamelaunch/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine configuration directory"))?;
        Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Apply `GAMELAUNCH_*` environment overrides in place. Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if let Some(repository) = var(REPOSITORY_ENV) {
            debug!("Repository overridden by {}", REPOSITORY_ENV);
            self.repository = repository;
        }
        if let Some(data_dir) = var(DATA_DIR_ENV) {
            debug!("Data directory overridden by {}", DATA_DIR_ENV);
            self.data_dir = Some(data_dir);
        }
        if let Some(api) = var(API_URL_ENV) {
            debug!("API base URL overridden by {}", API_URL_ENV);
            self.api_base_url = api;
        }
    }

    /// The data directory with `~` and environment variables expanded.
    ///
    /// Defaults to `<local data dir>/gamelaunch`.
    pub fn resolved_data_dir(&self) -> Result<PathBuf, LauncherError> {
        match &self.data_dir {
            Some(raw) => shellexpand::full(raw).map(|p| PathBuf::from(p.as_ref())).map_err(|e| {
                LauncherError::ConfigError {
                    message: format!("cannot expand data_dir '{raw}': {e}"),
                }
            }),
            None => dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME)).ok_or_else(|| {
                LauncherError::ConfigError {
                    message: "unable to determine the local data directory; set data_dir"
                        .to_string(),
                }
            }),
        }
    }

    /// Validate and resolve into the context used by the pipeline.
    ///
    /// # Errors
    ///
    /// [`LauncherError::ConfigError`] for a malformed repository, or for file
    /// names that are empty, not a single path component, or that collide, [`LauncherError::PlatformNotSupported`] when no override is set on
    /// a host other than Windows or MacOS.
    pub fn into_context(self) -> Result<LaunchContext, LauncherError> {
        let repository: RepositoryId = self.repository.parse()?;

        for (key, value) in [
            ("install_dir_name", &self.install_dir_name),
            ("version_file_name", &self.version_file_name),
            ("archive_file_name", &self.archive_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(LauncherError::ConfigError {
                    message: format!("{key} must not be empty"),
                });
            }
            if !is_single_component(value) {
                return Err(LauncherError::ConfigError {
                    message: format!("{key} must be a plain file name, got '{value}'"),
                });
            }
        }
        if self.install_dir_name == self.version_file_name
            || self.install_dir_name == self.archive_file_name
        {
            return Err(LauncherError::ConfigError {
                message: format!(
                    "install_dir_name '{}' collides with the version record or archive name",
                    self.install_dir_name
                ),
            });
        }

        let data_dir = self.resolved_data_dir()?;
        let platform = match self.platform {
            Some(kind) => kind,
            None => PlatformKind::detect()?,
        };

        Ok(LaunchContext {
            repository,
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            install_root: data_dir.join(&self.install_dir_name),
            version_record_path: data_dir.join(&self.version_file_name),
            archive_path: data_dir.join(&self.archive_file_name),
            data_dir,
            platform,
            user_agent: self.user_agent,
        })
    }
}

/// True when `name` is exactly one normal path component.
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Everything a pipeline operation needs to know, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    /// Repository whose latest release is installed.
    pub repository: RepositoryId,
    /// Release API base URL without a trailing slash.
    pub api_base_url: String,
    /// Parent of the install root; holds the record and the archive.
    pub data_dir: PathBuf,
    /// Directory holding the extracted release.
    pub install_root: PathBuf,
    /// Version record file, outside the install root.
    pub version_record_path: PathBuf,
    /// Download target, outside the install root.
    pub archive_path: PathBuf,
    /// Platform the pipeline installs for.
    pub platform: PlatformKind,
    /// `User-Agent` header value.
    pub user_agent: String,
}
