use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_logging_to_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let log_file = root.join("logs").join("hnlu.log");

    let config_path = root.join("config.toml");
    let config_content = format!(
        r#"
version = 1
[profiles.default]

[logging]
level = "warn"
file_level = "debug"
file = "{}"
"#,
        log_file.display()
    );
    fs::write(&config_path, &config_content).unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hnlu"));
    cmd.arg("--config")
        .arg(&config_path)
        .args(["parse", "--today", "2020-03-01", "my steps last week"])
        .assert()
        .success();

    assert!(log_file.exists(), "Log file should be created");
}

#[test]
fn test_logging_level_parsing() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "version = 1\n[profiles.default]\n\n[logging]\nlevel = \"trace\"\n")
        .unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hnlu"));
    cmd.arg("--config").arg(&config_path).arg("doctor").assert().success();
}
