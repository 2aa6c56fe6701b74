//! Binary-level tests: argument validation and a full run against a mocked
//! OpenAI-compatible server

use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vtt-summarizer"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("binary should start")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[tokio::test]
async fn no_arguments_prints_usage() {
    let output = run(&[]).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn wrong_extension_is_rejected() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let output = run(&[file.path().to_str().unwrap()]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not a .vtt file"));
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.vtt");
    let output = run(&[missing.to_str().unwrap()]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));
}

#[tokio::test]
async fn summary_goes_to_stdout_and_diagnostics_to_stderr() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "The team shipped." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".vtt").tempfile().unwrap();
    writeln!(
        file,
        "WEBVTT\n\n00:00.000 --> 00:02.000\n[SPEAKER_0]: We shipped.\n\n00:02.000 --> 00:03.000\n[SPEAKER_1]: Great."
    )
    .unwrap();

    let base_url = format!("{}/v1", server.uri());
    let output = run(&[path_str(file.path()), "--base-url", base_url.as_str()]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "The team shipped.\n\n\n");
    assert!(stderr(&output).contains("Approximate token length: 5"));
}

#[tokio::test]
async fn generation_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("out of memory"))
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".vtt").tempfile().unwrap();
    writeln!(file, "00:00.000 --> 00:01.000\nHello there").unwrap();

    let base_url = format!("{}/v1", server.uri());
    let output = run(&[path_str(file.path()), "--base-url", base_url.as_str()]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("out of memory"));
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
