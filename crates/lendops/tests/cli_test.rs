//! Integration tests for the `lendops` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a gateway; the end-to-end cases talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_HOME: &str = "/tmp/lendops-cli-test-nonexistent";

/// Build a [`Command`] for the `lendops` binary with env isolation.
///
/// Clears all `LENDOPS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn lendops_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lendops");
    cmd.env("HOME", NO_HOME)
        .env("XDG_CONFIG_HOME", NO_HOME)
        .env("XDG_DATA_HOME", NO_HOME)
        .env("LENDOPS_CONFIG", format!("{NO_HOME}/config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("LENDOPS_PROFILE")
        .env_remove("LENDOPS_GATEWAY")
        .env_remove("LENDOPS_TOKEN")
        .env_remove("LENDOPS_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same isolation, but with a config file the test controls.
fn lendops_with_config(config: &Path) -> assert_cmd::Command {
    let mut cmd = lendops_cmd();
    cmd.env("LENDOPS_CONFIG", config);
    cmd
}

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let file = dir.join("config.toml");
    std::fs::write(&file, contents).unwrap();
    file
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn loan_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "loanNumber": "LN-0001",
        "customerId": "C-1",
        "principal": "5000.00",
        "status": "ACTIVE"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = lendops_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    lendops_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("lending platform")
            .and(predicate::str::contains("loans"))
            .and(predicate::str::contains("accounting"))
            .and(predicate::str::contains("compliance")),
    );
}

#[test]
fn test_version_flag() {
    lendops_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lendops"));
}

#[test]
fn test_subcommand_help() {
    lendops_cmd()
        .args(["loans", "repay", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--amount"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    lendops_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    lendops_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    lendops_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = lendops_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_loans_list_without_gateway() {
    lendops_cmd()
        .args(["loans", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No gateway configured"));
}

#[test]
fn test_unknown_profile_lists_available() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[profiles.prod]\ngateway = \"https://ops.example.com/api\"\n",
    );
    lendops_with_config(&config)
        .args(["-p", "staging", "reports", "dashboard"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging").and(predicate::str::contains("prod")));
}

#[test]
fn test_rejects_non_http_gateway() {
    lendops_cmd()
        .args(["--gateway", "ftp://ops.example.com", "--token", "t", "loans", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http"));
}

#[test]
fn test_bad_amount_is_usage_error() {
    lendops_cmd()
        .args([
            "--gateway",
            "http://127.0.0.1:9",
            "--token",
            "t",
            "loans",
            "repay",
            "L-1",
            "--amount",
            "lots",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_destructive_command_requires_yes_without_tty() {
    lendops_cmd()
        .args(["--gateway", "http://127.0.0.1:9", "--token", "t", "media", "delete", "M-1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("media delete"));
}

#[test]
fn test_unreachable_gateway_is_connection_error() {
    lendops_cmd()
        .args(["--gateway", "http://127.0.0.1:9", "--token", "t", "loans", "get", "L-1"])
        .assert()
        .code(7);
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_profiles_marks_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "default_profile = \"prod\"\n\n\
         [profiles.prod]\ngateway = \"https://ops.example.com/api\"\n\n\
         [profiles.dev]\ngateway = \"http://localhost:8080\"\n",
    );
    lendops_with_config(&config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout("dev\nprod *\n");
}

#[test]
fn test_config_use_persists_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "default_profile = \"prod\"\n\n\
         [profiles.prod]\ngateway = \"https://ops.example.com/api\"\n\n\
         [profiles.dev]\ngateway = \"http://localhost:8080\"\n",
    );
    lendops_with_config(&config)
        .args(["config", "use", "dev"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&config).unwrap();
    assert!(saved.contains("default_profile = \"dev\""), "{saved}");

    lendops_with_config(&config)
        .args(["config", "use", "staging"])
        .assert()
        .code(2);
}

#[test]
fn test_config_show_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[profiles.prod]\ngateway = \"https://ops.example.com/api\"\nusername = \"ops\"\n",
    );
    let output = lendops_with_config(&config)
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["profiles"]["prod"]["username"], "ops");
    assert_eq!(shown["defaults"]["output"], "table");
}

// ── Against a mock gateway ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_loans_get_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loans/api/v1/loans/L-1"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(loan_json("L-1")))
        .expect(1)
        .mount(&server)
        .await;

    let output = lendops_cmd()
        .args(["--gateway", &server.uri(), "--token", "t0ken", "-o", "json"])
        .args(["loans", "get", "L-1"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let loan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(loan["id"], "L-1");
    assert_eq!(loan["status"], "ACTIVE");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_loans_get_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loans/api/v1/loans/L-404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Loan L-404 not found" })),
        )
        .mount(&server)
        .await;

    lendops_cmd()
        .args(["--gateway", &server.uri(), "--token", "t", "loans", "get", "L-404"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Loan L-404 not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_names_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        &format!("[profiles.branch]\ngateway = \"{}\"\n", server.uri()),
    );

    lendops_with_config(&config)
        .args(["-p", "branch", "--token", "stale", "auth", "whoami"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Token expired").and(predicate::str::contains("branch")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_loans_list_plain_from_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loans/api/v1/loans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [loan_json("L-1"), loan_json("L-2")],
            "totalElements": 2,
            "totalPages": 1,
            "size": 20,
            "number": 0,
            "first": true,
            "last": true
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        &format!(
            "default_profile = \"hq\"\n\n[defaults]\noutput = \"plain\"\n\n\
             [profiles.hq]\ngateway = \"{}\"\n",
            server.uri()
        ),
    );

    lendops_with_config(&config)
        .args(["--token", "t", "loans", "list"])
        .assert()
        .success()
        .stdout("L-1\nL-2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dashboard_degrades_to_zeroes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reporting/api/v1/reports/dashboard"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    lendops_cmd()
        .args(["--gateway", &server.uri(), "--token", "t", "reports", "dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active loans"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_rejection_has_its_own_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/loans/api/v1/loans/L-1/repayments"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Amount exceeds outstanding balance"
        })))
        .mount(&server)
        .await;

    lendops_cmd()
        .args(["--gateway", &server.uri(), "--token", "t"])
        .args(["loans", "repay", "L-1", "--amount", "99999", "--date", "2026-03-01"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Amount exceeds outstanding balance"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dot_dot_id_never_reaches_the_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    lendops_cmd()
        .args(["--gateway", &server.uri(), "--token", "t", "--yes"])
        .args(["media", "delete", ".."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("identifier"));
}
