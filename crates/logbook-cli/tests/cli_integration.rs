//! Integration tests for logbook-cli
//!
//! These tests verify the CLI commands work end-to-end without a backend.
//! Each test points LOGBOOK_CONFIG_PATH at a temp dir; tests run serially.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the logbook binary with an isolated config file
fn logbook(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("logbook").unwrap();
    cmd.env("LOGBOOK_CONFIG_PATH", config_dir.path().join("config.json"))
        .env_remove("LOGBOOK_API_URL")
        .env_remove("LOGBOOK_API_TOKEN")
        .env_remove("LOGBOOK_VEHICLE_ID");
    cmd
}

const SCAN: &str = "\
08 Auto HVAC 00819 High Pressure Sensor
19 CAN Gateway 03582 Radio no signal

01 Engine P0300 Random/Multiple Cylinder Misfire Detected
";

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("logbook"))
        .stdout(predicate::str::contains("Commands"));
}

#[test]
#[serial]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("logbook"));
}

#[test]
#[serial]
fn test_subcommand_help() {
    let dir = TempDir::new().unwrap();
    for args in [
        vec!["service", "--help"],
        vec!["service", "intervals", "--help"],
        vec!["reminders", "--help"],
        vec!["faults", "--help"],
        vec!["summary", "--help"],
        vec!["config", "--help"],
    ] {
        logbook(&dir).args(&args).assert().success();
    }
}

#[test]
#[serial]
fn test_service_help_lists_actions() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["service", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("timeline"))
        .stdout(predicate::str::contains("intervals"));
}

// =============================================================================
// Faults Command Tests (offline)
// =============================================================================

#[test]
#[serial]
fn test_faults_parse_file() {
    let dir = TempDir::new().unwrap();
    let scan = dir.path().join("scan.txt");
    std::fs::write(&scan, SCAN).unwrap();

    logbook(&dir)
        .args(["faults", "parse", scan.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto HVAC"))
        .stdout(predicate::str::contains("00819"))
        .stdout(predicate::str::contains("P0300"));
}

#[test]
#[serial]
fn test_faults_parse_stdin_json() {
    let dir = TempDir::new().unwrap();
    let output = logbook(&dir)
        .args(["--format", "json", "faults", "parse", "-"])
        .write_stdin(SCAN)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["address"], "19");
    assert_eq!(rows[1]["component"], "CAN Gateway");
    assert_eq!(rows[1]["fault_code"], "03582");
    assert_eq!(rows[1]["description"], "Radio no signal");
    assert_eq!(rows[1]["status"], "active");
}

#[test]
#[serial]
fn test_faults_parse_missing_file() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["faults", "parse", "/nonexistent/scan.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
#[serial]
fn test_faults_import_requires_vehicle() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["faults", "import", "-"])
        .write_stdin(SCAN)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No vehicle selected"));
}

// =============================================================================
// Service Command Tests
// =============================================================================

#[test]
#[serial]
fn test_service_status_requires_vehicle() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["service", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No vehicle selected"));
}

#[test]
#[serial]
fn test_invalid_today_is_rejected() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["--today", "31/08/2024", "service", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
#[serial]
fn test_invalid_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["--format", "yaml", "summary"])
        .assert()
        .failure();
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
#[serial]
fn test_config_path_uses_env() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
#[serial]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["config", "set", "vehicle_id", "3"])
        .assert()
        .success();

    logbook(&dir)
        .args(["config", "get", "vehicle_id"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));

    assert!(dir.path().join("config.json").exists());
}

#[test]
#[serial]
fn test_config_token_is_masked() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["config", "set", "api_token", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());

    logbook(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****"))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
#[serial]
fn test_config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    logbook(&dir)
        .args(["config", "set", "api_url", "localhost:5000"])
        .assert()
        .failure();

    logbook(&dir)
        .args(["config", "set", "no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
#[serial]
fn test_config_show_json() {
    let dir = TempDir::new().unwrap();
    let output = logbook(&dir)
        .args(["--format", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["key"], "api_url");
    assert_eq!(rows[0]["value"], "http://localhost:5000");
    assert_eq!(rows[0]["source"], "default");
}

#[test]
#[serial]
fn test_bad_stored_url_can_be_repaired() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"api_url":"localhost:5000"}"#).unwrap();

    // Offline commands still run
    logbook(&dir)
        .args(["faults", "parse", "-"])
        .write_stdin("08 Auto HVAC 00819 X\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("00819"));

    logbook(&dir)
        .args(["config", "set", "api_url", "http://localhost:5000"])
        .assert()
        .success();

    logbook(&dir)
        .args(["config", "get", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::diff("http://localhost:5000\n"));
}

#[test]
#[serial]
fn test_bad_stored_url_blocks_backend_commands() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"api_url":"localhost:5000"}"#).unwrap();

    logbook(&dir)
        .args(["--vehicle", "1", "summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_url must start with"))
        .stderr(predicate::str::contains("logbook config set"));

    logbook(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("localhost:5000"));
}
