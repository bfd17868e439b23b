//! Test utilities for the launcher
//!
//! Helpers shared by unit tests (`#[cfg(test)]`) and the integration suites
//! (through the `test-utils` feature):
//! - once-guarded tracing setup
//! - zip archive and release payload fixtures
//! - a throwaway data directory with a ready [`LaunchContext`](crate::config::LaunchContext)
//!
//! # Example
//!
//! ```rust,no_run
//! use gamelaunch_cli::platform::PlatformKind;
//! use gamelaunch_cli::test_utils::{TestEnvironment, ZipFixture};
//!
//! let env = TestEnvironment::new("http://127.0.0.1:1234", PlatformKind::Windows);
//! ZipFixture::new().file("Game/Game.exe", b"MZ").write_to(&env.context.archive_path);
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::{ZipFixture, release_json};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Runs once per process. Uses `level` when given, otherwise `RUST_LOG`; with
/// neither, no subscriber is installed.
///
/// ```bash
/// RUST_LOG=gamelaunch_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
