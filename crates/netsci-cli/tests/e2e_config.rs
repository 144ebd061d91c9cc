//! E2E tests for configuration and the reference commands:
//! `netsci.toml` defaults, `FORMAT` precedence, `netsci fixtures`,
//! `netsci completions`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn netsci_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("netsci"));
    cmd.current_dir(dir);
    cmd.env("NETSCI_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env("HOME", dir);
    cmd.env_remove("FORMAT");
    cmd
}

fn write_config(dir: &Path, body: &str) {
    std::fs::write(dir.join("netsci.toml"), body).expect("write netsci.toml");
}

#[test]
fn project_config_selects_json_output() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "[output]\nformat = \"json\"\n");

    let output = netsci_cmd(dir.path())
        .args(["fixtures"])
        .output()
        .expect("netsci should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("config asked for JSON");
    assert_eq!(json["fixtures"].as_array().map(Vec::len), Some(6));
}

#[test]
fn format_env_beats_project_config() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "[output]\nformat = \"json\"\n");

    netsci_cmd(dir.path())
        .env("FORMAT", "text")
        .args(["fixtures"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("shortest-paths\t7\t"));
}

#[test]
fn format_flag_beats_env() {
    let dir = TempDir::new().unwrap();
    let output = netsci_cmd(dir.path())
        .env("FORMAT", "text")
        .args(["fixtures", "--format", "json"])
        .output()
        .expect("netsci should not crash");
    assert!(output.status.success());
    serde_json::from_slice::<Value>(&output.stdout).expect("flag asked for JSON");
}

#[test]
fn configured_granularity_is_the_bfs_default() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "[bfs]\ngranularity = \"neighbor\"\n");

    let output = netsci_cmd(dir.path())
        .args(["bfs", "-x", "betweenness", "--json"])
        .output()
        .expect("netsci should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["granularity"], "neighbor");
    assert!(
        json["trace"]
            .as_array()
            .expect("trace")
            .iter()
            .any(|step| step["event"]["kind"] == "neighbor")
    );
}

#[test]
fn power_above_configured_maximum_is_refused() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "[walks]\nmax_power = 3\n");

    netsci_cmd(dir.path())
        .args(["power", "-x", "matrix-powers", "-k", "4", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("power_too_large"));

    netsci_cmd(dir.path())
        .args(["power", "-x", "matrix-powers", "-k", "3", "--json"])
        .assert()
        .success();
}

#[test]
fn broken_config_reports_e1001() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "[output\nformat = ");

    netsci_cmd(dir.path())
        .args(["fixtures", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn fixtures_edges_flag_lists_pairs() {
    let dir = TempDir::new().unwrap();
    netsci_cmd(dir.path())
        .args(["fixtures", "--edges", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\tA-B\n"));
}

#[test]
fn completions_mention_binary_name() {
    let dir = TempDir::new().unwrap();
    netsci_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("netsci"));
}
