//! The `prref` binary as a workflow step sees it: exit code, stdout, $GITHUB_OUTPUT

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// `prref` with a clean environment, as if run outside any workflow
fn prref() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prref"));
    cmd.env_clear();
    cmd
}

/// `prref resolve` inside a GitHub Actions job writing to `output`
fn resolve_in_actions(output: &Path, text: &str) -> Output {
    prref()
        .env("GITHUB_ACTIONS", "true")
        .env("GITHUB_OUTPUT", output)
        .args(["resolve", "--text", text])
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_resolve_publishes_outputs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("github_output");

    let output = resolve_in_actions(&path, "Fixes #12\n\ncore ref: abc1234\n");

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "core_ref=abc1234\nsolana_ref=develop\nsdk_ref=develop\n"
    );
    assert!(!stdout(&output).contains("::error"));
}

#[test]
fn test_rejected_reference_fails_with_one_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("github_output");

    let output = resolve_in_actions(&path, "core ref: main\nsolana ref: v1.02\n");

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    let errors: Vec<&str> = out.lines().filter(|l| l.starts_with("::error")).collect();
    assert_eq!(errors.len(), 1, "{}", out);
    assert!(errors[0].starts_with("::error title=Invalid reference for solana::"));
    assert!(errors[0].contains("MalformedVersionLike"));

    let published = std::fs::read_to_string(&path).unwrap_or_default();
    assert!(published.is_empty(), "{}", published);
}

#[test]
fn test_unwritable_output_file_fails_the_run() {
    let dir = TempDir::new().unwrap();

    // A directory cannot be opened for appending
    let output = resolve_in_actions(dir.path(), "core ref: abc1234");

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("::error title=Cannot write GITHUB_OUTPUT::"), "{}", out);
    assert!(!out.contains("::warning"));
}

#[test]
fn test_unfilled_template_prints_defaults() {
    let output = prref()
        .args([
            "resolve",
            "--output-format",
            "json",
            "--text",
            "## Refs\ncore ref: \nsolana ref: \nsdk ref: \n",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "core_ref": "develop",
            "solana_ref": "develop",
            "sdk_ref": "develop",
        })
    );
}

#[test]
fn test_logged_text_cannot_inject_workflow_commands() {
    let output = prref()
        .args([
            "resolve",
            "--output-format",
            "text",
            "--text",
            "hello\n::error title=spoof::fake\n::stop-commands::token\n",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("spoof"), "{}", err);
    assert!(!err.lines().any(|l| l.starts_with("::")), "{}", err);
    assert!(!stdout(&output).lines().any(|l| l.starts_with("::")));
}

#[test]
fn test_logs_have_no_colour_codes_when_piped() {
    let output = prref()
        .args(["resolve", "--output-format", "json", "--text", "sdk ref: v1.0.0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(!stderr(&output).contains('\u{1b}'));
}

#[test]
fn test_not_a_pull_request_uses_defaults_with_notice() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("github_output");

    let output = prref()
        .env("GITHUB_ACTIONS", "true")
        .env("GITHUB_OUTPUT", &path)
        .env("GITHUB_REF", "refs/heads/main")
        .arg("resolve")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output)
        .lines()
        .any(|l| l.starts_with("::notice::not a pull request")));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "core_ref=develop\nsolana_ref=develop\nsdk_ref=develop\n"
    );
}

#[test]
fn test_classify_exit_codes() {
    let ok = prref()
        .args(["classify", "main", "abc1234", "v2.1.0"])
        .output()
        .unwrap();
    assert_eq!(ok.status.code(), Some(0));

    let rejected = prref()
        .args(["classify", "--json", "main", "v1.02"])
        .output()
        .unwrap();
    assert_eq!(rejected.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(stdout(&rejected).trim()).unwrap();
    assert_eq!(json[0]["accepted"], true);
    assert_eq!(json[1]["reason"], "MalformedVersionLike");
}
