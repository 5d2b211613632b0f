//! E2E CLI tests covering:
//! - `roadmap show` with ready, failed and raw documents
//! - Unknown ids and their JSON error contract
//! - `roadmap config show/set/unset` in project and user scope
//! - `roadmap completions`
//!
//! Each test runs the `roadmap` binary as a subprocess in an isolated temp
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn roadmap_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("roadmap"));
    cmd.current_dir(dir);
    cmd.env("ROADMAP_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd.env_remove("ROADMAP_FORMAT");
    cmd
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = roadmap_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

/// Write `content` as the document for the seed record "Project Foundation".
fn write_foundation_doc(dir: &Path, content: &str) {
    let docs = dir.join("public/markdown");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::write(docs.join("project-foundation.md"), content).unwrap();
}

const FOUNDATION_DOC: &str = "# Project Foundation\n\nSet up the **base** platform.\n\n- repository\n- CI pipeline\n";

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_json_includes_ready_document() {
    let dir = TempDir::new().unwrap();
    write_foundation_doc(dir.path(), FOUNDATION_DOC);

    let shown = run_json(dir.path(), &["show", "1"]);
    assert_eq!(shown["record"]["id"], "1");
    assert_eq!(shown["record"]["name"], "Project Foundation");
    assert_eq!(shown["record"]["details"], "/markdown/project-foundation.md");
    assert_eq!(shown["document"]["state"], "ready");
    assert_eq!(shown["document"]["content"], FOUNDATION_DOC);
    assert!(shown["document"].get("error").is_none());
}

#[test]
fn show_renders_markdown_as_text() {
    let dir = TempDir::new().unwrap();
    write_foundation_doc(dir.path(), FOUNDATION_DOC);

    roadmap_cmd(dir.path())
        .args(["show", "1", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project Foundation"))
        .stdout(predicate::str::contains("Engineering Team"))
        .stdout(predicate::str::contains("Sep 1, 2025"))
        .stdout(predicate::str::contains("• CI pipeline"))
        .stdout(predicate::str::contains("**base**").not());
}

#[test]
fn show_raw_prints_markdown_source() {
    let dir = TempDir::new().unwrap();
    write_foundation_doc(dir.path(), FOUNDATION_DOC);

    roadmap_cmd(dir.path())
        .args(["show", "1", "--raw", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set up the **base** platform."))
        .stdout(predicate::str::contains("- repository"));
}

#[test]
fn show_reports_missing_document_inline() {
    let dir = TempDir::new().unwrap();

    let shown = run_json(dir.path(), &["show", "2"]);
    assert_eq!(shown["record"]["id"], "2");
    assert_eq!(shown["document"]["state"], "failed");
    assert_eq!(shown["document"]["error_code"], "E6101");
    assert!(
        shown["document"]["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to load markdown")
    );

    roadmap_cmd(dir.path())
        .args(["show", "2", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Core Features Development"))
        .stdout(predicate::str::contains("Error: Failed to load markdown"));
}

#[test]
fn show_rejects_document_paths_outside_root() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("plan.toml"),
        r#"
[[records]]
id = "esc"
name = "Escape"
start_date = "2025-09-01"
end_date = "2025-09-30"
status = "planned"
owner = "Ops"
details = "/../secret.md"
"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("secret.md"), "top secret").unwrap();

    let shown = run_json(dir.path(), &["show", "esc", "--records", "plan.toml"]);
    assert_eq!(shown["document"]["state"], "failed");
    assert!(shown["document"].get("content").is_none());
}

#[test]
fn show_record_without_document() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("plan.json"),
        r#"{"records":[{"id":"n","name":"No docs","start_date":"2025-09-01","end_date":"2025-09-02","status":"planned","owner":"Ops","details":""}]}"#,
    )
    .unwrap();

    let shown = run_json(dir.path(), &["show", "n", "--records", "plan.json"]);
    assert_eq!(shown["document"]["state"], "none");
}

#[test]
fn show_unknown_id_fails_with_code() {
    let dir = TempDir::new().unwrap();
    let output = roadmap_cmd(dir.path())
        .args(["show", "99", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["error_code"], "E2001");
    assert!(err["error"]["message"].as_str().unwrap().contains("99"));

    roadmap_cmd(dir.path())
        .args(["show", "99", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: "));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_show_reports_defaults() {
    let dir = TempDir::new().unwrap();
    let config = run_json(dir.path(), &["config", "show"]);
    assert_eq!(config["project"]["layout"]["row_spacing"], 200);
    assert_eq!(config["project"]["layout"]["row_spacing_min"], 160);
    assert_eq!(config["project"]["layout"]["row_spacing_max"], 480);
    assert_eq!(config["project"]["documents"]["root"], "public");
    assert_eq!(config["resolved_output"], "json");
}

#[test]
fn config_set_row_spacing_changes_snapshots() {
    let dir = TempDir::new().unwrap();
    let ack = run_json(dir.path(), &["config", "set", "layout.row_spacing", "280"]);
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["action"], "set");
    assert!(dir.path().join(".roadmap/config.toml").exists());

    let config = run_json(dir.path(), &["config", "show"]);
    assert_eq!(config["project"]["layout"]["row_spacing"], 280);

    let snapshot = run_json(dir.path(), &["chart"]);
    assert_eq!(snapshot["row_spacing"], 280);
    assert_eq!(snapshot["container_height"], 6 * 280 + 150);

    run_json(dir.path(), &["config", "unset", "layout.row_spacing"]);
    let snapshot = run_json(dir.path(), &["chart"]);
    assert_eq!(snapshot["row_spacing"], 200);
}

#[test]
fn config_spacing_outside_bounds_is_clamped() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["config", "set", "layout.row_spacing", "900"]);
    let snapshot = run_json(dir.path(), &["chart"]);
    assert_eq!(snapshot["row_spacing"], 480);
}

#[test]
fn config_set_rejects_unknown_keys_and_bad_values() {
    let dir = TempDir::new().unwrap();
    roadmap_cmd(dir.path())
        .args(["config", "set", "layout.colour", "red"])
        .assert()
        .failure();
    roadmap_cmd(dir.path())
        .args(["config", "set", "layout.row_spacing", "wide"])
        .assert()
        .failure();
    roadmap_cmd(dir.path())
        .args(["config", "set", "--scope", "user", "output", "yaml"])
        .assert()
        .failure();
}

#[test]
fn untyped_failures_report_no_error_code() {
    let dir = TempDir::new().unwrap();
    let output = roadmap_cmd(dir.path())
        .args(["config", "set", "layout.colour", "red", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(err["error"]["message"].as_str().unwrap().contains("layout.colour"));
    assert!(err["error"].get("error_code").is_none());
}

#[test]
fn user_output_setting_picks_default_format() {
    let dir = TempDir::new().unwrap();
    roadmap_cmd(dir.path())
        .args(["config", "set", "--scope", "user", "output", "json"])
        .assert()
        .success();
    assert!(dir.path().join(".xdg/roadmap/config.toml").exists());

    let output = roadmap_cmd(dir.path()).args(["owners"]).output().unwrap();
    assert!(output.status.success());
    let choices: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(choices["owners"].as_array().unwrap().len(), 6);

    // An explicit flag still wins.
    roadmap_cmd(dir.path())
        .args(["owners", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("KIND  NAME  ROW  ITEMS"));
}

#[test]
fn malformed_project_config_fails_with_code() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".roadmap")).unwrap();
    std::fs::write(dir.path().join(".roadmap/config.toml"), "[layout\nrow_spacing = ").unwrap();

    let output = roadmap_cmd(dir.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["error_code"], "E1002");
}

// ---------------------------------------------------------------------------
// completions
// ---------------------------------------------------------------------------

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().unwrap();
    roadmap_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("roadmap"))
        .stdout(predicate::str::contains("chart"));
}
