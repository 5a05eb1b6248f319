//! CLI Integration Tests
//!
//! These tests verify that the CLI commands work correctly end-to-end.
//! They test the actual binary behavior, not just the library.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Run daybook against an isolated store and config, return (stdout, stderr, success)
///
/// No config file is written, so calendar days default to UTC.
fn run_daybook(args: &[&str], dir: &Path) -> (String, String, bool) {
    let store = dir.join("store.json");
    let config = dir.join("config.json");

    let output = Command::new(env!("CARGO_BIN_EXE_daybook"))
        .args(["-f", "json"])
        .arg("--store")
        .arg(&store)
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute daybook");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn run_json(args: &[&str], dir: &Path) -> serde_json::Value {
    let (stdout, stderr, success) = run_daybook(args, dir);
    assert!(success, "daybook {:?} failed: {}", args, stderr);
    serde_json::from_str(stdout.trim()).expect("stdout should be JSON")
}

fn values(json: &serde_json::Value) -> Vec<serde_json::Value> {
    json.as_array()
        .expect("expected an array of entries")
        .iter()
        .map(|e| e["value"].clone())
        .collect()
}

// ============================================================================
// Write Tests
// ============================================================================

#[test]
fn test_cli_insert_creates_store() {
    let dir = tempdir().unwrap();

    let json = run_json(&["insert", "weather/temp", "10°C", "--date", "2024-01-01"], dir.path());

    assert_eq!(json["status"], "ok");
    assert!(json["recorded_at"].is_i64());
    assert!(dir.path().join("store.json").exists());
}

#[test]
fn test_cli_insert_parses_json_values() {
    let dir = tempdir().unwrap();

    run_json(&["insert", "profile/age", "42"], dir.path());
    run_json(&["insert", "profile/name", "John Smith"], dir.path());

    let age = run_json(&["latest", "profile/age"], dir.path());
    let name = run_json(&["latest", "profile/name"], dir.path());
    assert_eq!(age["value"], 42);
    assert_eq!(name["value"], "John Smith");
}

#[test]
fn test_cli_bad_date_fails() {
    let dir = tempdir().unwrap();

    let (_stdout, stderr, success) =
        run_daybook(&["insert", "k", "1", "--date", "someday"], dir.path());

    assert!(!success, "insert with an unparsable date should fail");
    assert!(stderr.contains("Invalid date"), "stderr: {}", stderr);
}

// ============================================================================
// Query Tests
// ============================================================================

fn seed_weather(dir: &Path) {
    run_json(&["insert", "t", "\"10°C\"", "--date", "2024-01-01T08:00"], dir);
    run_json(&["insert", "t", "\"12°C\"", "--date", "2024-01-01T18:00"], dir);
    run_json(&["insert", "t", "\"8°C\"", "--date", "2024-01-03T09:00"], dir);
}

#[test]
fn test_cli_range() {
    let dir = tempdir().unwrap();
    seed_weather(dir.path());

    let json = run_json(&["range", "t", "2024-01-01", "2024-01-03"], dir.path());
    assert_eq!(values(&json), vec!["10°C", "12°C", "8°C"]);

    let json = run_json(&["range", "t", "2024-01-02", "2024-01-02"], dir.path());
    assert!(values(&json).is_empty());
}

#[test]
fn test_cli_snapshot() {
    let dir = tempdir().unwrap();
    seed_weather(dir.path());

    let json = run_json(&["snapshot", "t", "2024-01-01", "2024-01-03"], dir.path());
    assert_eq!(values(&json), vec!["12°C", "8°C"]);
    assert_eq!(json[0]["effective_date"], "2024-01-01T18:00:00+00:00");
}

#[test]
fn test_cli_latest_and_on() {
    let dir = tempdir().unwrap();
    seed_weather(dir.path());

    let latest = run_json(&["latest", "t"], dir.path());
    assert_eq!(latest["value"], "8°C");

    let on = run_json(&["on", "t", "2024-01-01"], dir.path());
    assert_eq!(on["value"], "12°C");
    assert_eq!(on["date"], "2024-01-01");

    let missing = run_json(&["on", "t", "2024-01-02"], dir.path());
    assert!(missing["value"].is_null());
}

#[test]
fn test_cli_utc_offset_changes_days() {
    let dir = tempdir().unwrap();
    run_json(&["insert", "t", "1", "--date", "2024-01-02T03:00:00Z"], dir.path());

    let (stdout, _stderr, success) = run_daybook(
        &["--utc-offset=-300", "on", "t", "2024-01-01"],
        dir.path(),
    );
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(json["value"], 1);
}

// ============================================================================
// Key Management Tests
// ============================================================================

#[test]
fn test_cli_keys_remove_clear() {
    let dir = tempdir().unwrap();
    run_json(&["insert", "a", "1"], dir.path());
    run_json(&["insert", "b", "2"], dir.path());

    let keys = run_json(&["keys"], dir.path());
    assert_eq!(keys, serde_json::json!(["a", "b"]));

    run_json(&["remove", "a"], dir.path());
    let keys = run_json(&["keys"], dir.path());
    assert_eq!(keys, serde_json::json!(["b"]));

    let all = run_json(&["all", "a"], dir.path());
    assert!(values(&all).is_empty());

    run_json(&["clear"], dir.path());
    let keys = run_json(&["keys"], dir.path());
    assert_eq!(keys, serde_json::json!([]));
}

#[test]
fn test_cli_text_format_is_pretty() {
    let dir = tempdir().unwrap();
    run_json(&["insert", "a", "1"], dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_daybook"))
        .arg("--store")
        .arg(dir.path().join("store.json"))
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["-f", "text", "latest", "a"])
        .output()
        .expect("Failed to execute daybook");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("\n  \"value\": 1"), "stdout: {}", stdout);
}

#[test]
fn test_cli_text_format_absent_value_is_null() {
    let dir = tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_daybook"))
        .arg("--store")
        .arg(dir.path().join("store.json"))
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["-f", "text", "latest", "never-written"])
        .output()
        .expect("Failed to execute daybook");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("\n  \"value\": null"), "stdout: {}", stdout);
}
