use chrono::NaiveDate;
use healthnlu_core::config::loader::ConfigLoader;
use healthnlu_core::{DataSourceType, MeasureUnit};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn load_default_profile_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
measure_unit = "us"
data_initial_date = "2019-06-01"
bedtime_shift_hour = 14

[profiles.default.goals]
step_count = 10000
weight = 70.5
"#;

    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), None).expect("should load");
    assert_eq!(rc.active_profile, "default");
    assert_eq!(rc.source.as_deref(), Some(cfg_path.as_path()));
    assert_eq!(rc.measure_unit, MeasureUnit::Us);
    assert_eq!(rc.data_initial_date, NaiveDate::from_ymd_opt(2019, 6, 1));
    assert_eq!(rc.nlu.bedtime_shift_hour, 14);
    assert_eq!(rc.goals.get(&DataSourceType::StepCount), Some(&10_000.0));
    assert_eq!(rc.goals.get(&DataSourceType::Weight), Some(&70.5));
    assert_eq!(rc.logging.level, "info");
}

#[test]
fn load_with_profile_override_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("healthnlu/config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
measure_unit = "metric"

[profiles.travel]
measure_unit = "us"
"#;
    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), Some("travel")).expect("should load");
    assert_eq!(rc.active_profile, "travel");
    assert_eq!(rc.measure_unit, MeasureUnit::Us);
    assert_eq!(rc.data_initial_date, None);
    assert_eq!(rc.nlu.bedtime_shift_hour, 12);
    assert!(rc.goals.is_empty());
}

#[test]
fn profile_defaults_to_default() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = 1\n[profiles.default]\n");

    let rc = ConfigLoader::load(Some(&cfg_path), None).expect("should load");
    assert_eq!(rc.active_profile, "default");
    assert_eq!(rc.measure_unit, MeasureUnit::Metric);
}

#[test]
fn logging_section_is_resolved() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    let log_path = tmp.path().join("logs/hnlu.log");
    let toml = format!(
        r#"
version = 1

[profiles.default]

[logging]
level = "debug"
file_level = "trace"
file = "{}"
"#,
        log_path.display()
    );
    write_file(&cfg_path, &toml);

    let rc = ConfigLoader::load(Some(&cfg_path), None).expect("should load");
    assert_eq!(rc.logging.level, "debug");
    assert_eq!(rc.logging.file_level.as_deref(), Some("trace"));
    assert_eq!(rc.logging.file.as_deref(), Some(log_path.as_path()));
}
