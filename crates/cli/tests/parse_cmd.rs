use predicates::prelude::*;
use serde_json::Value;
use assert_cmd::Command;
use tempfile::tempdir;

fn hnlu() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hnlu"));
    // keep the user's config out of the way
    let tmp = tempdir().unwrap();
    cmd.env("XDG_CONFIG_HOME", tmp.keep());
    cmd
}

#[test]
fn parse_prints_a_table() {
    hnlu()
        .args(["parse", "--today", "2020-03-01", "show my steps last week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("intent:    Browse"))
        .stdout(predicate::str::contains("20200217..20200223"))
        .stdout(predicate::str::contains("step_count"));
}

#[test]
fn parse_json_is_machine_readable() {
    let output = hnlu()
        .args(["parse", "--json", "--seed", "3", "--today", "2020-03-01", "heavier than 150"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let result = &json[0];
    assert_eq!(result["intent"], "Highlight");
    let variables = result["variables"].as_object().unwrap();
    assert_eq!(variables.len(), 1);
    let condition = variables.values().next().unwrap();
    assert_eq!(condition["type"], "Condition");
    assert_eq!(condition["value"]["type"], "more");
    assert_eq!(condition["value"]["implied_data_source"], "weight");
    assert_eq!(condition["value"]["ref"], 150.0);
}

#[test]
fn parse_reads_stdin() {
    hnlu()
        .args(["parse", "--today", "2020-03-01"])
        .write_stdin("2019\n\nsince february\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("20190101..20191231"))
        .stdout(predicate::str::contains("20200201..20200301"));
}

#[test]
fn parse_rejects_bad_dates() {
    hnlu()
        .args(["parse", "--today", "yesterday", "steps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--today"));
}

#[test]
fn parse_header_lines() {
    let output = hnlu()
        .args(["parse", "--today", "2020-03-01", "Compare my steps in January and February"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let header: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("sentence:") || l.starts_with("intent:"))
        .collect();
    insta::assert_snapshot!(header.join("\n"), @r"
    sentence:  Compare my steps in January and February
    intent:    Compare
    ");
}
