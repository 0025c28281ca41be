//! End-to-end tests driving the HTTP surface against a live listener.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use keybridge_codec::{seal, KdfParams};
use keybridge_server::{router, AppState};
use keybridge_vault::{Entry, Group, Hierarchy};

fn fast_params() -> KdfParams {
    KdfParams {
        memory_cost: 8,
        time_cost: 1,
        parallelism: 1,
    }
}

fn entry(pairs: &[(&str, &str)]) -> Entry {
    Entry::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    )
}

/// Root with one full entry plus a sub-group holding a sparse one.
fn first_vault() -> Hierarchy {
    Hierarchy::new(Group::new(
        "Root",
        vec![entry(&[
            ("UserName", "alice"),
            ("Title", "Bank"),
            ("Password", "s3cret"),
            ("URL", "https://bank.example"),
        ])],
        vec![Group::new(
            "G1",
            vec![entry(&[("UserName", "bob")])],
            Vec::new(),
        )],
    ))
}

fn second_vault() -> Hierarchy {
    Hierarchy::new(Group::new(
        "Root",
        vec![entry(&[("UserName", "carol"), ("Title", "Mail")])],
        Vec::new(),
    ))
}

fn write_vault(path: &Path, hierarchy: &Hierarchy, password: &str) {
    let sealed = seal(hierarchy, password, fast_params()).unwrap();
    std::fs::write(path, sealed).unwrap();
}

/// Seal the first vault, load it, and serve it on an ephemeral port.
async fn spawn_app(dir: &Path) -> SocketAddr {
    let vault_path = dir.join("vault.kbv");
    write_vault(&vault_path, &first_vault(), "alpha");

    let state = Arc::new(AppState::new(vault_path));
    state.store.load(&state.vault_path, "alpha").unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

async fn get_json(url: &str) -> (reqwest::StatusCode, serde_json::Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn search_descends_into_sub_groups() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;

    let (status, body) = get_json(&format!("http://{addr}/search?username=bob")).await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["username"], "bob");
    // Fields bob's entry does not carry come back empty.
    assert_eq!(body["title"], "");
    assert_eq!(body["password"], "");
    assert_eq!(body["url"], "");
}

#[tokio::test]
async fn search_requires_every_field_to_match() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;

    let (status, body) =
        get_json(&format!("http://{addr}/search?username=alice&title=Bank")).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["password"], "s3cret");
    assert_eq!(body["url"], "https://bank.example");

    let (status, body) =
        get_json(&format!("http://{addr}/search?username=alice&title=Wrong")).await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn search_without_criteria_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;

    let (status, body) = get_json(&format!("http://{addr}/search")).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid criteria"));

    // Empty-valued parameters count as absent.
    let (status, _) = get_json(&format!("http://{addr}/search?username=&title=")).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_is_never_a_search_key() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;

    // The parameter is not recognized, so no criteria remain.
    let (status, _) = get_json(&format!("http://{addr}/search?password=s3cret")).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_reload_keeps_serving_old_data() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/reload"))
        .form(&[("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    // The store still answers from the previously loaded hierarchy.
    let (status, body) = get_json(&format!("http://{addr}/search?username=bob")).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["username"], "bob");
}

#[tokio::test]
async fn successful_reload_switches_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    // Replace the container on disk, sealed under a new password.
    write_vault(&dir.path().join("vault.kbv"), &second_vault(), "beta");

    let response = client
        .post(format!("http://{addr}/reload"))
        .form(&[("password", "beta")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");

    let (status, _) = get_json(&format!("http://{addr}/search?username=bob")).await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);

    let (status, body) = get_json(&format!("http://{addr}/search?username=carol")).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["title"], "Mail");
}

#[tokio::test]
async fn reload_with_missing_file_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    std::fs::remove_file(dir.path().join("vault.kbv")).unwrap();

    let response = client
        .post(format!("http://{addr}/reload"))
        .form(&[("password", "alpha")])
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );

    // Old data remains authoritative even after an I/O failure.
    let (status, _) = get_json(&format!("http://{addr}/search?username=alice")).await;
    assert_eq!(status, reqwest::StatusCode::OK);
}
