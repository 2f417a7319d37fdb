//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the spice-to-sch-cli binary (finds it in target/debug when run via cargo test).
fn spice_to_sch_cli() -> Command {
    cargo_bin_cmd!("spice-to-sch-cli")
}

/// Path to spice-to-sch library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("spice-to-sch")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = spice_to_sch_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("xschem"))
        .stdout(predicate::str::contains("--input-file"));
}

#[test]
fn test_cli_version() {
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-v");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_convert_file_to_stdout() {
    let mut cmd = spice_to_sch_cli();
    let path = fixtures_dir().join("inverter.spice");

    cmd.arg("-i").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("v {xschem version=3.4.6RC file_version=1.2\n}"))
        .stdout(predicate::str::contains("{name=p0 lab=A}"))
        .stdout(predicate::str::contains("N 0 0 0 60 {lab=Y}"));
}

#[test]
fn test_cli_convert_stdin() {
    let mut cmd = spice_to_sch_cli();
    let netlist = std::fs::read_to_string(fixtures_dir().join("nand2.spice")).unwrap();

    cmd.write_stdin(netlist);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("C {sky130_fd_pr/pfet_01v8_hvt.sym}"));
}

#[test]
fn test_cli_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("inv.sch");
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-i")
        .arg(fixtures_dir().join("inverter.spice"))
        .arg("-o")
        .arg(&out);

    cmd.assert().success().stdout(predicate::str::is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("spiceprefix=X"));
}

#[test]
fn test_cli_json_report() {
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-i")
        .arg(fixtures_dir().join("nand2.spice"))
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["report"]["subcircuit"], "nand2");
    assert_eq!(json["stats"]["transistors"], 4);
}

#[test]
fn test_cli_missing_ends_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("broken.sch");
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-i")
        .arg(fixtures_dir().join("missing_ends.spice"))
        .arg("-o")
        .arg(&out);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains(".ends"));
    assert!(!out.exists());
}

#[test]
fn test_cli_nonexistent_file() {
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-i").arg("/nonexistent/file.spice");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_cli_config_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, r#"{"layout": {"io_origin": {"x": 0, "y": 0}}}"#).unwrap();
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-i")
        .arg(fixtures_dir().join("inverter.spice"))
        .arg("-c")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("C {ipin.sym} 0 0 0 0 {name=p0 lab=A}"));
}

#[test]
fn test_cli_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, "{ not json").unwrap();
    let mut cmd = spice_to_sch_cli();

    cmd.arg("-i")
        .arg(fixtures_dir().join("inverter.spice"))
        .arg("-c")
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
