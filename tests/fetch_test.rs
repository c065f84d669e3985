//! Integration tests for `aocc-integrator fetch`
//!
//! A wiremock server stands in for the release mirror.

mod common;

use aocc_integrator::infra::download::sha256_hex;
use common::{combined_output, TestProject};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_blocking(project: &TestProject, args: Vec<String>) -> std::process::Output {
    let mut cmd = project.command();
    cmd.args(&args);
    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute aocc-integrator"))
        .await
        .expect("Command task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_from_mirror() {
    let server = MockServer::start().await;
    let body = b"aocc release tarball".to_vec();
    Mock::given(method("GET"))
        .and(path("/aocc-compiler-5.0.0.tar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let project = TestProject::new();
    let output_dir = project.path().join("downloads");

    let output = run_blocking(
        &project,
        vec![
            "fetch".into(),
            "--url".into(),
            format!("{}/aocc-compiler-5.0.0.tar", server.uri()),
            "--sha256".into(),
            sha256_hex(&body),
            "--output".into(),
            output_dir.display().to_string(),
        ],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        std::fs::read(output_dir.join("aocc-compiler-5.0.0.tar")).unwrap(),
        body
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_defaults_to_cache_dir_and_reuses_file() {
    let server = MockServer::start().await;
    let body = b"aocc release tarball".to_vec();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let project = TestProject::new();
    let args = vec![
        "fetch".to_string(),
        "--url".into(),
        format!("{}/aocc-compiler-5.0.0.tar", server.uri()),
        "--sha256".into(),
        sha256_hex(&body),
        "--json".into(),
    ];

    let first = run_blocking(&project, args.clone()).await;
    assert!(first.status.success(), "{}", combined_output(&first));
    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(json["downloaded"], true);
    assert!(project.file_exists("cache/downloads/aocc-compiler-5.0.0.tar"));

    let second = run_blocking(&project, args).await;
    assert!(second.status.success(), "{}", combined_output(&second));
    let json: serde_json::Value = serde_json::from_slice(&second.stdout).unwrap();
    assert_eq!(json["downloaded"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_checksum_mismatch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tampered".to_vec()))
        .mount(&server)
        .await;
    let project = TestProject::new();

    let output = run_blocking(
        &project,
        vec![
            "fetch".into(),
            "--url".into(),
            format!("{}/aocc-compiler-5.0.0.tar", server.uri()),
            "--sha256".into(),
            sha256_hex(b"original"),
        ],
    )
    .await;

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("Checksum verification failed"));
    assert!(!project.file_exists("cache/downloads/aocc-compiler-5.0.0.tar"));
}

#[test]
fn test_fetch_url_requires_sha256() {
    let project = TestProject::new();

    let output = project.run(&["fetch", "--url", "http://127.0.0.1:9/aocc.tar"]);

    assert!(!output.status.success());
}
