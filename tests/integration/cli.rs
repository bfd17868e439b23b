//! The `gamelaunch` binary against a mock release server.

use crate::common::{asset_url, mount_asset, mount_release};
use assert_cmd::Command;
use gamelaunch_cli::test_utils::ZipFixture;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct CliEnv {
    temp: TempDir,
    config: PathBuf,
}

impl CliEnv {
    fn new(api_base_url: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        let data_dir = temp.path().join("data");
        std::fs::write(
            &config,
            format!(
                "repository = \"acme/game\"\n\
                 api_base_url = \"{api_base_url}\"\n\
                 data_dir = '{}'\n\
                 platform = \"windows\"\n",
                data_dir.display()
            ),
        )
        .unwrap();
        Self {
            temp,
            config,
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("gamelaunch").unwrap();
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--no-progress")
            .env_remove("GAMELAUNCH_CONFIG")
            .env_remove("GAMELAUNCH_REPOSITORY")
            .env_remove("GAMELAUNCH_DATA_DIR")
            .env_remove("GAMELAUNCH_API_URL")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_record(data_dir: &Path, version: &str) {
    std::fs::create_dir_all(data_dir).unwrap();
    std::fs::write(data_dir.join("version.json"), format!("{{\"version\":\"{version}\"}}"))
        .unwrap();
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("gamelaunch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("run"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_json_reports_fresh_install() {
    let server = MockServer::start().await;
    mount_release(&server, "v1.2.0", &["game-win.zip", "game-mac.zip"]).await;
    let env = CliEnv::new(&server.uri());

    let output = env.cmd().args(["check", "--json"]).output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        json_stdout(&output),
        serde_json::json!({
            "isUpToDate": false,
            "latestVersion": "v1.2.0",
            "localVersion": null,
            "assetUrl": asset_url(&server, "game-win.zip"),
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn check_json_up_to_date() {
    let server = MockServer::start().await;
    mount_release(&server, "v1.1.0", &["game-win.zip"]).await;
    let env = CliEnv::new(&server.uri());
    write_record(&env.data_dir(), "v1.1.0");

    let output = env.cmd().args(["check", "--json"]).output().unwrap();

    let json = json_stdout(&output);
    assert_eq!(json["isUpToDate"], true);
    assert_eq!(json["localVersion"], "v1.1.0");
}

#[tokio::test(flavor = "multi_thread")]
async fn check_json_failure_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let env = CliEnv::new(&server.uri());

    let output = env.cmd().args(["check", "--json"]).output().unwrap();

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["error"], true);
    assert!(json["message"].as_str().unwrap().starts_with("Server connection failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_human_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let env = CliEnv::new(&server.uri());

    env.cmd()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server connection failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn install_writes_record() {
    let server = MockServer::start().await;
    let archive = ZipFixture::new().file("Game/Game.exe", b"MZ").to_bytes();
    mount_asset(&server, "game-win.zip", archive, 1).await;
    let env = CliEnv::new(&server.uri());

    env.cmd()
        .args(["install", "--url", &asset_url(&server, "game-win.zip"), "--version", "v1.2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed").and(predicate::str::contains("v1.2.0")));

    let record = std::fs::read_to_string(env.data_dir().join("version.json")).unwrap();
    assert_eq!(record, r#"{"version":"v1.2.0"}"#);
    assert!(env.data_dir().join("Game/Game/Game.exe").is_file());
    assert!(!env.data_dir().join("update.zip").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn run_without_asset_or_install_fails() {
    let server = MockServer::start().await;
    mount_release(&server, "v1.0.0", &["game-linux.tar.gz"]).await;
    let env = CliEnv::new(&server.uri());

    env.cmd()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no asset compatible with Windows"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_up_to_date_goes_straight_to_launch() {
    let server = MockServer::start().await;
    mount_release(&server, "v1.1.0", &["game-win.zip"]).await;
    mount_asset(&server, "game-win.zip", Vec::new(), 0).await;
    let env = CliEnv::new(&server.uri());
    write_record(&env.data_dir(), "v1.1.0");

    // Nothing installed under the root, so the launch reports and exits cleanly
    env.cmd()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Game is up to date"))
        .stdout(predicate::str::contains("Nothing to launch"));
}

#[test]
fn launch_without_install_is_not_fatal() {
    let env = CliEnv::new("http://127.0.0.1:9");

    env.cmd()
        .arg("launch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to launch"));
}

#[test]
fn status_shows_layout() {
    let env = CliEnv::new("http://127.0.0.1:9");
    write_record(&env.data_dir(), "v0.9.0");

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("acme/game"))
        .stdout(predicate::str::contains("v0.9.0"))
        .stdout(predicate::str::contains("Install root does not exist"));
}

#[test]
fn config_init_and_show() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("nested").join("config.toml");

    Command::cargo_bin("gamelaunch")
        .unwrap()
        .env_remove("GAMELAUNCH_REPOSITORY")
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
    assert!(config.is_file());

    Command::cargo_bin("gamelaunch")
        .unwrap()
        .env_remove("GAMELAUNCH_REPOSITORY")
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("J3YCEN/project_alpha_releases"));

    Command::cargo_bin("gamelaunch")
        .unwrap()
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn invalid_repository_is_config_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "repository = \"nope\"\nplatform = \"windows\"\ndata_dir = \"/tmp\"\n")
        .unwrap();

    Command::cargo_bin("gamelaunch")
        .unwrap()
        .env_remove("GAMELAUNCH_REPOSITORY")
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must look like 'owner/name'"));
}
