//! Global constants used throughout the launcher.
//!
//! Defaults for the release index, on-disk layout, and platform keywords live
//! here so configuration, pipeline, and tests agree on them.

/// Repository whose latest GitHub release is installed (`owner/name`).
pub const DEFAULT_REPOSITORY: &str = "J3YCEN/project_alpha_releases";

/// Base URL of the release-hosting API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Media type requested from the GitHub REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Name of the application directory under the platform data dir.
pub const APP_DIR_NAME: &str = "gamelaunch";

/// Install root directory name, relative to the data dir.
pub const DEFAULT_INSTALL_DIR_NAME: &str = "Game";

/// Version record file name, stored beside (never inside) the install root.
pub const DEFAULT_VERSION_FILE_NAME: &str = "version.json";

/// Temporary archive file name, stored beside the install root.
pub const DEFAULT_ARCHIVE_FILE_NAME: &str = "update.zip";

/// Config file name inside the platform config dir.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Asset-name keyword selecting Windows builds (matched case-insensitively).
pub const WINDOWS_ASSET_KEYWORD: &str = "win";

/// Asset-name keyword selecting MacOS builds (matched case-insensitively).
pub const MACOS_ASSET_KEYWORD: &str = "mac";

/// Extension of the Windows entry point.
pub const WINDOWS_EXECUTABLE_EXTENSION: &str = ".exe";

/// Suffix of MacOS application bundles.
pub const MACOS_BUNDLE_EXTENSION: &str = ".app";

/// Bundled crash reporters contain this in their file name.
pub const CRASH_HANDLER_MARKER: &str = "crash";

/// Subdirectory of a bundle holding its executables.
pub const MACOS_PAYLOAD_DIR: [&str; 2] = ["Contents", "MacOS"];

/// Mode applied to bundle executables (rwxr-xr-x).
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Message shown when the release check cannot reach the server.
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Server connection failed. Check your network or GitHub release.";
