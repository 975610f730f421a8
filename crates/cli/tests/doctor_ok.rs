use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn doctor_reads_provided_config_path() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
measure_unit = "us"
data_initial_date = "2019-06-01"

[profiles.default.goals]
step_count = 10000
"#;
    write_file(&cfg, toml);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hnlu"));
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   hnlu doctor"))
        .stdout(predicate::str::contains("profile: default"))
        .stdout(predicate::str::contains("measure_unit: Us"))
        .stdout(predicate::str::contains("data_initial_date: 2019-06-01"))
        .stdout(predicate::str::contains("goals: step_count=10000"))
        .stdout(predicate::str::contains("rules: 11 date parsers, 3 refiners"))
        .stdout(predicate::str::contains("phrases: 5 data-source rules, 5 cycle rules"));
}

#[test]
fn doctor_uses_xdg_default_when_present() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("healthnlu").join("config.toml");
    write_file(
        &cfg_path,
        r#"
version = 1
profile = "night"
[profiles.night]
bedtime_shift_hour = 15
"#,
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hnlu"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   hnlu doctor"))
        .stdout(predicate::str::contains("profile: night"))
        .stdout(predicate::str::contains("bedtime_shift_hour: 15"));
}

#[test]
fn doctor_falls_back_to_defaults() {
    let tmp = tempdir().unwrap();
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hnlu"));
    cmd.env("XDG_CONFIG_HOME", tmp.path()); // empty dir → no config
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("built-in defaults"))
        .stdout(predicate::str::contains("measure_unit: Metric"))
        .stdout(predicate::str::contains("bedtime_shift_hour: 12"));
}
