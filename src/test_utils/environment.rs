//! Throwaway launcher data directories.

use crate::config::{LaunchContext, LauncherConfig};
use crate::platform::PlatformKind;
use crate::version::VersionStore;
use std::path::Path;
use tempfile::TempDir;

/// A temporary data directory and the context pointing at it.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub context: LaunchContext,
}

impl TestEnvironment {
    /// Context for repository `acme/game` against `api_base_url`.
    pub fn new(api_base_url: &str, platform: PlatformKind) -> Self {
        super::init_test_logging(None);

        let temp_dir = TempDir::new().expect("create temp dir");
        let config = LauncherConfig {
            repository: "acme/game".to_string(),
            api_base_url: api_base_url.to_string(),
            data_dir: Some(temp_dir.path().join("data").display().to_string()),
            platform: Some(platform),
            user_agent: "gamelaunch-test".to_string(),
            ..LauncherConfig::default()
        };
        let context = config.into_context().expect("valid test context");

        Self {
            temp_dir,
            context,
        }
    }

    /// Data directory (parent of the install root). Not created up front.
    pub fn data_dir(&self) -> &Path {
        &self.context.data_dir
    }

    /// Store for the environment's version record.
    pub fn version_store(&self) -> VersionStore {
        VersionStore::new(&self.context.version_record_path)
    }

    /// Write a version record directly, simulating an earlier install.
    pub fn seed_version(&self, version: &str) {
        std::fs::create_dir_all(self.data_dir()).expect("create data dir");
        std::fs::write(
            &self.context.version_record_path,
            serde_json::json!({ "version": version }).to_string(),
        )
        .expect("write version record");
    }

    /// Create a file under the install root.
    pub fn seed_install_file(&self, relative: &str, content: &[u8]) {
        let path = self.context.install_root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create install dir");
        }
        std::fs::write(path, content).expect("write install file");
    }
}
