#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MANIFEST_PATH: &str = "/mc/game/version_manifest.json";

pub fn manifest_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), MANIFEST_PATH)
}

/// Manifest listing `ids`, each pointing at `/v1/packages/<id>.json`.
pub async fn mount_manifest(server: &MockServer, ids: &[&str]) {
    let versions: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "type": "release",
                "url": format!("{}/v1/packages/{}.json", server.uri(), id),
                "time": "2023-06-12T13:25:51+00:00",
                "releaseTime": "2023-06-12T13:25:51+00:00"
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(MANIFEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latest": { "release": ids.first().copied().unwrap_or_default() },
            "versions": versions
        })))
        .mount(server)
        .await;
}

/// Metadata for `id` whose server download is `/objects/<id>/server.jar`,
/// serving `jar` there.
pub async fn mount_version(server: &MockServer, id: &str, jar: &[u8]) {
    let jar_path = format!("/objects/{id}/server.jar");

    Mock::given(method("GET"))
        .and(path(format!("/v1/packages/{id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "downloads": {
                "server": {
                    "sha1": "0000000000000000000000000000000000000000",
                    "size": jar.len(),
                    "url": format!("{}{}", server.uri(), jar_path)
                }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(jar_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jar.to_vec()))
        .mount(server)
        .await;
}

/// Executable shell script used in place of the Java binary.
#[cfg(unix)]
pub fn fake_java(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-java");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}
