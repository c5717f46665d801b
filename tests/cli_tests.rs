use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn launchflow() -> Command {
    let mut cmd = cargo_bin_cmd!("launchflow");
    cmd.env_remove("WALLET_PRIVATE_KEY").env_remove("RPC_URL");
    cmd
}

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn help_lists_commands() {
    launchflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("allowance"))
        .stdout(predicate::str::contains("modal"));
}

#[test]
fn modal_confirmed_as_json() {
    let output = launchflow()
        .args(["modal", "confirmed", "--json"])
        .output()
        .expect("run launchflow");
    assert!(output.status.success());

    let descriptor: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("modal is JSON");
    assert_eq!(descriptor["show_close"], true);
    assert_eq!(descriptor["show_retry"], false);
}

#[test]
fn modal_rejection_offers_retry() {
    launchflow()
        .args(["modal", "error", "--rejected", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Request rejected"))
        .stdout(predicate::str::contains("\"show_retry\":true"));
}

#[test]
fn modal_in_flight_cannot_close() {
    launchflow()
        .args(["modal", "confirming", "--action", "add-liquidity", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"show_close\":false"));
}

#[test]
fn unknown_step_is_usage_error() {
    launchflow()
        .args(["modal", "pending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown workflow step"));
}

#[test]
fn run_without_key_fails() {
    let config = write_temp_config("");
    launchflow()
        .args(["run", "contribute", "--id", "1", "--amount", "5", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("WALLET_PRIVATE_KEY"));
}

#[test]
fn invalid_config_is_reported() {
    let config = write_temp_config("[workflow]\nreset_delay_secs = 0\n");
    launchflow()
        .args(["allowance", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("workflow.reset_delay_secs"));
}
