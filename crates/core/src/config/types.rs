use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::pipeline::NluConfig;
use crate::vars::types::{DataSourceType, MeasureUnit};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub measure_unit: MeasureUnit,
    /// First day with recorded data, `YYYY-MM-DD`.
    pub data_initial_date: Option<String>,
    pub bedtime_shift_hour: Option<u32>,
    /// Daily goal per metric, e.g. `step_count = 10000`.
    #[serde(default)]
    pub goals: HashMap<DataSourceType, f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub active_profile: String,
    /// File the settings came from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
    pub measure_unit: MeasureUnit,
    pub data_initial_date: Option<NaiveDate>,
    pub goals: HashMap<DataSourceType, f64>,
    pub nlu: NluConfig,
    pub logging: LoggingConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            active_profile: "default".to_string(),
            source: None,
            measure_unit: MeasureUnit::default(),
            data_initial_date: None,
            goals: HashMap::new(),
            nlu: NluConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
