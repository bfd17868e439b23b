//! Shared mock-server helpers.

use gamelaunch_cli::test_utils::release_json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LATEST_PATH: &str = "/repos/acme/game/releases/latest";

/// Download URL of `name` on `server`.
pub fn asset_url(server: &MockServer, name: &str) -> String {
    format!("{}/download/{name}", server.uri())
}

/// Serve `tag` with the named assets as the latest release.
pub async fn mount_release(server: &MockServer, tag: &str, assets: &[&str]) {
    let urls: Vec<String> = assets.iter().map(|name| asset_url(server, name)).collect();
    let pairs: Vec<(&str, &str)> =
        assets.iter().copied().zip(urls.iter().map(String::as_str)).collect();

    Mock::given(method("GET"))
        .and(path(LATEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_json(tag, &pairs)))
        .mount(server)
        .await;
}

/// Serve `body` as the asset `name`, expecting exactly `calls` downloads.
pub async fn mount_asset(server: &MockServer, name: &str, body: Vec<u8>, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(calls)
        .mount(server)
        .await;
}
