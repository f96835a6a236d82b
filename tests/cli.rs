use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn scan_builtin_sample() {
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.assert()
        .success()
        .stdout("/foo, Kind=bar\n/test, Kind=test\n/yup, Kind=aha\n");
}

#[test]
fn scan_sample_with_each_strategy() {
    for strategy in ["reader", "decoder", "both"] {
        let mut cmd = cargo_bin_cmd!("gvk-scan");
        cmd.arg("--strategy").arg(strategy);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("/test, Kind=test"));
    }
}

#[test]
fn scan_file_as_json() {
    let fixture = write_fixture("apiVersion: apps/v1\nkind: Deployment\n");
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.arg(fixture.path()).arg("--format").arg("json");

    let output_pred = predicate::str::contains("\"group\": \"apps\"")
        .and(predicate::str::contains("\"kind\": \"Deployment\""));
    cmd.assert().success().stdout(output_pred);
}

#[test]
fn scan_stdin_as_yaml() {
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.arg("-")
        .arg("--format")
        .arg("yaml")
        .write_stdin("apiVersion: batch/v1\nkind: Job\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("group: batch").and(predicate::str::contains("kind: Job")));
}

#[test]
fn malformed_input_fails() {
    let fixture = write_fixture("apiVersion: v1\nkind: \"open\n---\n");
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.arg(fixture.path());
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("quoted scalar is never closed"));
}

#[test]
fn unknown_strategy_fails() {
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.arg("--strategy").arg("frame");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Config 'frame' not found"));
}

#[test]
fn missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.arg("/nonexistent/gvk-scan/manifest.yaml");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read /nonexistent/gvk-scan/manifest.yaml"));
}

#[test]
fn list_strategies() {
    let mut cmd = cargo_bin_cmd!("gvk-scan");
    cmd.arg("list-strategies");
    cmd.assert().success().stdout(
        predicate::str::contains("reader")
            .and(predicate::str::contains("decoder"))
            .and(predicate::str::contains("both")),
    );
}
