//! gamelaunch - self-updating game installer and launcher
//!
//! Keeps a local install of a game in sync with the latest GitHub release of a
//! single repository, then starts it. The library exposes the update pipeline;
//! the `gamelaunch` binary is a thin CLI over it.
//!
//! # Architecture Overview
//!
//! ```text
//! ReleaseResolver ──▶ compare with VersionStore ──▶ Downloader (progress channel)
//!        │                                               │
//!        ▼                                               ▼
//!   UpdateCheck                     Installer: wipe, recreate, extract, drop archive,
//!                                   write version record, repair permissions
//!                                                        │
//!                                                        ▼
//!                              ExecutableLocator ──▶ Launcher (detached start)
//! ```
//!
//! ## Key Properties
//!
//! - **Full reinstall**: the install root is deleted before every extraction,
//!   so no file from a previous version survives
//! - **Record last**: the version record is written only after extraction
//!   succeeded; a failed install always forces a retry
//! - **Explicit context**: settings are resolved once into a
//!   [`config::LaunchContext`] and passed to every operation
//! - **One capability per platform**: all Windows/MacOS differences live behind
//!   [`platform::PlatformCapability`]
//!
//! # Core Modules
//!
//! - [`pipeline`] - `check_update`, `download_game`, `launch_game`
//! - [`release`] - latest-release query and asset selection
//! - [`download`] - streaming download with progress events
//! - [`installer`] - archive installation
//! - [`locator`] - entry-point discovery
//! - [`launcher`] - detached process start
//! - [`version`] - version record and comparison
//! - [`platform`] - platform kinds and capabilities
//!
//! ## Supporting Modules
//!
//! - [`cli`] - command-line interface
//! - [`config`] - configuration file, environment overrides, launch context
//! - [`core`] - error taxonomy and user-facing error reporting
//! - [`utils`] - filesystem helpers and progress bars
//! - [`constants`] - defaults shared across modules
//!
//! # Configuration (config.toml)
//!
//! ```toml
//! repository = "J3YCEN/project_alpha_releases"
//! data_dir = "~/Games/ProjectAlpha"
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use gamelaunch_cli::config::LauncherConfig;
//! use gamelaunch_cli::pipeline::{Pipeline, UpdateCheck};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let context = LauncherConfig::load(None).await?.into_context()?;
//! let pipeline = Pipeline::new(context)?;
//!
//! if let UpdateCheck::Report(report) = pipeline.check_update().await {
//!     println!("latest: {}", report.latest_version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// Update pipeline
pub mod download;
pub mod installer;
pub mod launcher;
pub mod locator;
pub mod pipeline;
pub mod platform;
pub mod release;
pub mod version;

pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
