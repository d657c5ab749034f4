//! Integration tests for the `mhac` CLI binary.
//!
//! These cover argument parsing, offline commands, config editing, and
//! error exits. None of them needs a reachable unit.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mhac` binary with env isolation.
///
/// Clears all `MHAC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn mhac_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mhac");
    cmd.env("HOME", "/tmp/mhac-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/mhac-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("MHAC_PROFILE")
        .env_remove("MHAC_HOST")
        .env_remove("MHAC_USERNAME")
        .env_remove("MHAC_PASSWORD")
        .env_remove("MHAC_CONFIG")
        .env_remove("MHAC_OUTPUT")
        .env_remove("MHAC_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`mhac_cmd`], reading and writing the config file at `path`.
fn mhac_with_config(path: &Path) -> assert_cmd::Command {
    let mut cmd = mhac_cmd();
    cmd.arg("--config").arg(path);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = mhac_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    mhac_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("MH-AC-WIFI-1")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("set")),
    );
}

#[test]
fn test_version_flag() {
    mhac_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mhac"));
}

#[test]
fn test_completions_zsh() {
    mhac_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_attributes_table() {
    mhac_cmd().arg("attributes").assert().success().stdout(
        predicate::str::contains("fanSpeed")
            .and(predicate::str::contains("outdoorTemperature"))
            .and(predicate::str::contains("cool")),
    );
}

#[test]
fn test_attributes_json() {
    let output = mhac_cmd()
        .args(["--output", "json", "attributes"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 14);

    let setpoint = entries
        .iter()
        .find(|e| e["attribute"] == "setpoint")
        .unwrap();
    assert_eq!(setpoint["uid"], 9);
    assert_eq!(setpoint["writable"], true);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let dir = tempfile::tempdir().unwrap();
    mhac_with_config(&dir.path().join("config.toml"))
        .args(["config", "show"])
        .assert()
        .success();
}

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("units.toml");
    mhac_with_config(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("units.toml"));
}

#[test]
fn test_config_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    mhac_with_config(&path)
        .args(["--profile", "bedroom", "config", "set", "host", "192.168.1.41"])
        .assert()
        .success();
    mhac_with_config(&path)
        .args(["--profile", "bedroom", "config", "set", "max_setpoint", "26"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[profiles.bedroom]"), "{written}");
    assert!(written.contains("192.168.1.41"), "{written}");

    mhac_with_config(&path)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bedroom"));
}

#[test]
fn test_config_set_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = mhac_with_config(&dir.path().join("config.toml"))
        .args(["config", "set", "site", "default"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown config key"));
}

#[test]
fn test_config_use_missing_profile() {
    let dir = tempfile::tempdir().unwrap();
    let output = mhac_with_config(&dir.path().join("config.toml"))
        .args(["config", "use", "garage"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("garage"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = mhac_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = mhac_cmd()
        .args(["--output", "invalid", "attributes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_status_without_unit() {
    let dir = tempfile::tempdir().unwrap();
    mhac_with_config(&dir.path().join("config.toml"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No unit configured"));
}

#[test]
fn test_status_without_password() {
    let dir = tempfile::tempdir().unwrap();
    let output = mhac_with_config(&dir.path().join("config.toml"))
        .args(["--host", "192.0.2.10", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_set_unknown_attribute() {
    let dir = tempfile::tempdir().unwrap();
    let output = mhac_with_config(&dir.path().join("config.toml"))
        .args(["--host", "192.0.2.10", "--password", "x", "set", "humidity", "40"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("humidity"));
}

#[test]
fn test_set_read_only_attribute() {
    let dir = tempfile::tempdir().unwrap();
    let output = mhac_with_config(&dir.path().join("config.toml"))
        .args([
            "--host",
            "192.0.2.10",
            "--password",
            "x",
            "set",
            "outdoor-temperature",
            "12",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("read-only"));
}

#[test]
fn test_set_out_of_range_value() {
    let dir = tempfile::tempdir().unwrap();
    let output = mhac_with_config(&dir.path().join("config.toml"))
        .args(["--host", "192.0.2.10", "--password", "x", "set", "fan-speed", "9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
