//! Integration tests for the viewbind CLI
//!
//! These tests run the actual binary and verify output.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the binary to test
#[allow(deprecated)]
fn viewbind_cmd() -> Command {
    let mut cmd = Command::cargo_bin("viewbind").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Run the binary off the async runtime (the mock server keeps serving)
async fn run_blocking(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || viewbind_cmd().args(&args).output().unwrap())
        .await
        .unwrap()
}

#[test]
fn test_help_flag() {
    viewbind_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Demo host for one-way bindings and async data tables",
        ));
}

#[test]
fn test_bind_prints_one_line_per_write() {
    viewbind_cmd()
        .args([
            "bind",
            "--template",
            "Hello {{ name }}!",
            "--property",
            "name",
            "--value",
            "Ada",
            "--value",
            "Grace",
        ])
        .assert()
        .success()
        .stdout("Hello Ada!\nHello Grace!\n");
}

#[test]
fn test_bind_without_value_renders_undefined() {
    viewbind_cmd()
        .args(["bind", "-t", "[{{ x }}]", "-p", "x"])
        .assert()
        .success()
        .stdout("[undefined]\n");
}

#[test]
fn test_counter_clicks() {
    viewbind_cmd()
        .args(["counter", "--clicks", "3"])
        .assert()
        .success()
        .stdout("Count: 0\nCount: 1\nCount: 2\nCount: 3\n");
}

#[test]
fn test_table_inline_data() {
    viewbind_cmd()
        .args(["table", "--data", r#"[{"id":1,"name":"John"}]"#, "--shadow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<data-table></data-table>"))
        .stdout(predicate::str::contains("<th>id</th><th>name</th>"))
        .stdout(predicate::str::contains("<td>1</td><td>John</td>"))
        .stdout(predicate::str::contains("1 rows × 2 columns"));
}

#[test]
fn test_table_invalid_inline_json_fails_with_fix() {
    viewbind_cmd()
        .args(["table", "--data", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON payload"))
        .stderr(predicate::str::contains("Fix:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_table_from_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"a": 1}, {"a": 2}])))
        .mount(&server)
        .await;

    let url = format!("{}/rows", server.uri());
    let output = run_blocking(vec!["table".into(), "--source".into(), url]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("data-source="))
        .stdout(predicate::str::contains("2 rows × 1 columns"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_table_from_failing_source_shows_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = run_blocking(vec![
        "table".into(),
        "--source".into(),
        server.uri(),
        "--shadow".into(),
    ])
    .await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Error loading data: HTTP error! status: 500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_balance_in_credit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/deposits/account123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"amountCredits": 1000, "amountDebits": 100})),
        )
        .mount(&server)
        .await;

    let output = run_blocking(vec![
        "balance".into(),
        "account123".into(),
        "--base-url".into(),
        server.uri(),
    ])
    .await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("account123"))
        .stdout(predicate::str::contains("is in credit"));
}
