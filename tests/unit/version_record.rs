//! Version record persistence and the up-to-date rule.

use gamelaunch_cli::version::{UpdateStatus, VersionStore};
use tempfile::TempDir;

#[test]
fn up_to_date_only_on_exact_equality() {
    let cases = [
        (Some("v1.1.0"), "v1.1.0", true),
        (Some("v1.1.0"), "v1.2.0", false),
        (Some("1.1.0"), "v1.1.0", false),
        (Some("V1.1.0"), "v1.1.0", false),
        (Some("v1.1.0 "), "v1.1.0", false),
        (None, "v1.1.0", false),
        (Some(""), "", false),
        (None, "", false),
    ];

    for (local, latest, up_to_date) in cases {
        assert_eq!(
            UpdateStatus::compare(local, latest).is_up_to_date(),
            up_to_date,
            "{local:?} vs {latest:?}"
        );
    }
}

#[test]
fn headline_distinguishes_fresh_install_and_update() {
    assert_eq!(UpdateStatus::compare(None, "v1").headline(), "Install the game");
    assert_eq!(UpdateStatus::compare(Some("v0"), "v1").headline(), "Update available");
    assert_eq!(UpdateStatus::compare(Some("v1"), "v1").headline(), "Game is up to date");
}

#[tokio::test]
async fn record_written_in_expected_shape() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("version.json");
    let store = VersionStore::new(&path);

    store.save("v1.2.0").await.unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({ "version": "v1.2.0" }));
    assert_eq!(store.load().await.as_deref(), Some("v1.2.0"));
}

#[tokio::test]
async fn unreadable_records_mean_no_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("version.json");
    let store = VersionStore::new(&path);

    assert_eq!(store.load().await, None);

    for content in ["", "not json", "{}", "{\"version\": 3}", "{\"version\": \"\"}"] {
        std::fs::write(&path, content).unwrap();
        assert_eq!(store.load().await, None, "content {content:?}");
    }
}
