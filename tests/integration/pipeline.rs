//! The update pipeline end to end against a mock release server.

use crate::common::{asset_url, mount_asset, mount_release};
use anyhow::Result;
use gamelaunch_cli::core::{LauncherError, find_launcher_error};
use gamelaunch_cli::download::progress_channel;
use gamelaunch_cli::launcher::LaunchOutcome;
use gamelaunch_cli::pipeline::{DownloadRequest, Pipeline, UpdateCheck, UpdateReport};
use gamelaunch_cli::platform::{PlatformCapability, PlatformKind, WindowsPlatform};
use gamelaunch_cli::test_utils::{TestEnvironment, ZipFixture};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;
use wiremock::MockServer;

/// Windows behavior without spawning anything.
#[derive(Default)]
struct FakeWindows {
    repairs: Mutex<usize>,
    started: Mutex<Vec<PathBuf>>,
}

impl PlatformCapability for FakeWindows {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn locate_entry_point(&self, install_root: &Path) -> Option<PathBuf> {
        WindowsPlatform.locate_entry_point(install_root)
    }

    fn repair_permissions(&self, _install_root: &Path) -> Result<()> {
        *self.repairs.lock().unwrap() += 1;
        Ok(())
    }

    fn start_detached(&self, entry_point: &Path) -> Result<u32> {
        self.started.lock().unwrap().push(entry_point.to_path_buf());
        Ok(1)
    }
}

fn report(check: UpdateCheck) -> UpdateReport {
    match check {
        UpdateCheck::Report(report) => report,
        UpdateCheck::Failed(failure) => panic!("check failed: {}", failure.message),
    }
}

fn tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn fresh_windows_install_end_to_end() {
    let server = MockServer::start().await;
    mount_release(&server, "v1.2.0", &["game-win.zip", "game-mac.zip"]).await;
    let archive = ZipFixture::new()
        .file("ProjectAlpha/ProjectAlpha.exe", b"MZ")
        .file("ProjectAlpha/UnityCrashHandler64.exe", b"MZ")
        .file("ProjectAlpha/Data/level0", b"data")
        .to_bytes();
    mount_asset(&server, "game-win.zip", archive, 1).await;
    mount_asset(&server, "game-mac.zip", Vec::new(), 0).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    let platform = Arc::new(FakeWindows::default());
    let pipeline = Pipeline::with_capability(env.context.clone(), platform.clone()).unwrap();

    let report = report(pipeline.check_update().await);
    assert!(!report.is_up_to_date);
    assert_eq!(report.local_version, None);
    assert_eq!(report.asset_url.as_deref(), Some(asset_url(&server, "game-win.zip").as_str()));

    let request = DownloadRequest {
        url: report.asset_url.unwrap(),
        version: report.latest_version,
    };
    pipeline.download_game(&request, None).await.unwrap();

    let record = std::fs::read_to_string(&env.context.version_record_path).unwrap();
    assert_eq!(record, r#"{"version":"v1.2.0"}"#);
    assert_eq!(
        tree(&env.context.install_root),
        vec![
            "ProjectAlpha/Data/level0",
            "ProjectAlpha/ProjectAlpha.exe",
            "ProjectAlpha/UnityCrashHandler64.exe"
        ]
    );
    assert!(!env.context.archive_path.exists());

    assert!(report_after(&pipeline).await.is_up_to_date);

    let outcome = pipeline.launch_game().await;
    let expected = env.context.install_root.join("ProjectAlpha/ProjectAlpha.exe");
    assert_eq!(outcome, LaunchOutcome::Started { path: expected.clone(), pid: 1 });
    assert_eq!(*platform.started.lock().unwrap(), vec![expected]);
    // Windows never repairs on launch
    assert_eq!(*platform.repairs.lock().unwrap(), 1);
}

async fn report_after(pipeline: &Pipeline) -> UpdateReport {
    report(pipeline.check_update().await)
}

#[tokio::test]
async fn up_to_date_skips_download_and_launches() {
    let server = MockServer::start().await;
    mount_release(&server, "v1.1.0", &["game-win.zip"]).await;
    mount_asset(&server, "game-win.zip", Vec::new(), 0).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    env.seed_version("v1.1.0");
    env.seed_install_file("Game.exe", b"MZ");
    let platform = Arc::new(FakeWindows::default());
    let pipeline = Pipeline::with_capability(env.context.clone(), platform.clone()).unwrap();

    let resolved = pipeline.resolve_status().await.unwrap();
    assert!(resolved.status.is_up_to_date());
    assert!(report(pipeline.check_update().await).is_up_to_date);

    assert!(pipeline.launch_game().await.is_started());
    assert_eq!(platform.started.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn update_replaces_previous_install() {
    let server = MockServer::start().await;
    mount_release(&server, "v2", &["game-win.zip"]).await;
    mount_asset(&server, "game-win.zip", ZipFixture::new().file("v2/Game.exe", b"2").to_bytes(), 1)
        .await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    env.seed_version("v1");
    env.seed_install_file("v1/Game.exe", b"1");
    env.seed_install_file("v1/save.dat", b"old");
    let pipeline = Pipeline::new(env.context.clone()).unwrap();

    let report = report(pipeline.check_update().await);
    assert_eq!(report.local_version.as_deref(), Some("v1"));

    let request = DownloadRequest {
        url: report.asset_url.unwrap(),
        version: report.latest_version,
    };
    pipeline.download_game(&request, None).await.unwrap();

    assert_eq!(tree(&env.context.install_root), vec!["v2/Game.exe"]);
    assert_eq!(pipeline.local_version().await.as_deref(), Some("v2"));
}

#[tokio::test]
async fn corrupt_archive_leaves_record_unchanged() {
    let server = MockServer::start().await;
    mount_asset(&server, "game-win.zip", b"PK\x03\x04 truncated".to_vec(), 1).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    env.seed_version("v1.1.0");
    env.seed_install_file("Game.exe", b"MZ");
    let pipeline = Pipeline::new(env.context.clone()).unwrap();

    let request = DownloadRequest {
        url: asset_url(&server, "game-win.zip"),
        version: "v1.2.0".to_string(),
    };
    let err = pipeline.download_game(&request, None).await.unwrap_err();

    let typed = find_launcher_error(&err).unwrap();
    assert!(matches!(typed, LauncherError::ExtractionFailed { .. }));
    assert_eq!(pipeline.local_version().await.as_deref(), Some("v1.1.0"));
    assert!(!env.context.install_root.exists());
    assert_eq!(pipeline.launch_game().await, LaunchOutcome::NotFound);
}

#[tokio::test]
async fn extraction_failing_midway_removes_partial_install() {
    let server = MockServer::start().await;
    let archive = ZipFixture::new()
        .file("Game/Game.exe", b"MZ v2")
        .file("../outside.txt", b"nope")
        .to_bytes();
    mount_asset(&server, "game-win.zip", archive, 1).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    env.seed_version("v1.1.0");
    env.seed_install_file("Game/Game.exe", b"MZ v1");
    let pipeline = Pipeline::new(env.context.clone()).unwrap();

    let request = DownloadRequest {
        url: asset_url(&server, "game-win.zip"),
        version: "v1.2.0".to_string(),
    };
    let err = pipeline.download_game(&request, None).await.unwrap_err();

    assert!(find_launcher_error(&err).unwrap().is_io());
    assert_eq!(env.version_store().load().await.as_deref(), Some("v1.1.0"));
    assert!(!env.context.install_root.exists());
    assert!(!env.data_dir().join("outside.txt").exists());
}

#[tokio::test]
async fn progress_events_are_monotonic() {
    let server = MockServer::start().await;
    let payload: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();
    let archive = ZipFixture::new().file("Game.exe", &payload).to_bytes();
    let size = archive.len() as u64;
    mount_asset(&server, "game-win.zip", archive, 1).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    let pipeline = Pipeline::new(env.context.clone()).unwrap();
    let (sender, mut receiver) = progress_channel();

    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        events
    });

    let request = DownloadRequest {
        url: asset_url(&server, "game-win.zip"),
        version: "v1".to_string(),
    };
    pipeline.download_game(&request, Some(sender)).await.unwrap();
    let events = collector.await.unwrap();

    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.bytes_total == Some(size)));
    assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
    assert_eq!(events.last().unwrap().bytes_received, size);
    assert_eq!(events.last().unwrap().percent, 100);
}

#[tokio::test]
async fn no_compatible_asset_is_distinct_from_failure() {
    let server = MockServer::start().await;
    mount_release(&server, "v3.0.0", &["game-linux.tar.gz"]).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::Windows);
    let pipeline = Pipeline::new(env.context.clone()).unwrap();

    let report = report(pipeline.check_update().await);
    assert!(!report.is_up_to_date);
    assert_eq!(report.asset_url, None);

    let resolved = pipeline.resolve_status().await.unwrap();
    let err = resolved.no_asset_error(pipeline.context());
    assert!(!err.is_network());
    assert!(!err.is_io());
}

#[tokio::test]
async fn unreachable_server_reports_connection_message() {
    let env = TestEnvironment::new("http://127.0.0.1:9", PlatformKind::MacOs);
    let pipeline = Pipeline::new(env.context.clone()).unwrap();

    let check = pipeline.check_update().await;

    let UpdateCheck::Failed(failure) = check else {
        panic!("expected failure");
    };
    assert!(failure.error);
    assert!(failure.message.starts_with("Server connection failed"));
}

#[cfg(unix)]
#[tokio::test]
async fn macos_install_repairs_bundle_permissions() {
    use gamelaunch_cli::platform::MacOsPlatform;
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    let archive = ZipFixture::new()
        .file_with_mode("ProjectAlpha.app/Contents/MacOS/ProjectAlpha", b"bin", 0o644)
        .file_with_mode("ProjectAlpha.app/Contents/MacOS/helper", b"bin", 0o600)
        .file_with_mode("ProjectAlpha.app/Contents/MacOS/.hidden", b"x", 0o644)
        .file_with_mode("ProjectAlpha.app/Contents/Resources/icon.icns", b"x", 0o644)
        .to_bytes();
    mount_asset(&server, "game-mac.zip", archive, 1).await;

    let env = TestEnvironment::new(&server.uri(), PlatformKind::MacOs);
    let platform = MacOsPlatform::default().with_xattr_program("gamelaunch-missing-xattr");
    let pipeline = Pipeline::with_capability(env.context.clone(), Arc::new(platform)).unwrap();

    let request = DownloadRequest {
        url: asset_url(&server, "game-mac.zip"),
        version: "v1.0.0".to_string(),
    };
    pipeline.download_game(&request, None).await.unwrap();

    let mode = |relative: &str| {
        std::fs::metadata(env.context.install_root.join(relative)).unwrap().permissions().mode()
            & 0o777
    };
    assert_eq!(mode("ProjectAlpha.app/Contents/MacOS/ProjectAlpha"), 0o755);
    assert_eq!(mode("ProjectAlpha.app/Contents/MacOS/helper"), 0o755);
    assert_eq!(mode("ProjectAlpha.app/Contents/MacOS/.hidden"), 0o644);
    assert_eq!(mode("ProjectAlpha.app/Contents/Resources/icon.icns"), 0o644);
    assert_eq!(pipeline.local_version().await.as_deref(), Some("v1.0.0"));
}
