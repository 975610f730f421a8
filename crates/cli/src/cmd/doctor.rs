use healthnlu_core::config::loader::{default_config_path, ConfigLoader};
use healthnlu_core::{NluConfig, Preprocessor};
use std::path::Path;

use crate::logging;

pub fn run(config: Option<&Path>, profile: Option<&str>) -> color_eyre::Result<()> {
    match ConfigLoader::load_or_default(config, profile) {
        Ok(rc) => {
            logging::init(&rc.logging)?;
            tracing::debug!(profile = %rc.active_profile, "configuration loaded");

            println!("OK   hnlu doctor");
            println!(
                "path: {}",
                rc.source.as_ref().map_or_else(
                    || format!("(built-in defaults; looked for {})", default_config_path().display()),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("measure_unit: {:?}", rc.measure_unit);
            println!(
                "data_initial_date: {}",
                rc.data_initial_date.map_or_else(|| "-".to_string(), |d| d.to_string())
            );
            println!("bedtime_shift_hour: {}", rc.nlu.bedtime_shift_hour);

            let mut goals: Vec<String> =
                rc.goals.iter().map(|(source, goal)| format!("{source}={goal}")).collect();
            goals.sort();
            println!("goals: {}", if goals.is_empty() { "-".to_string() } else { goals.join(", ") });
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }

            check_rules(&rc.nlu);
            println!("{}", healthnlu_core::doctor_stub());
            Ok(())
        }
        Err(e) => {
            println!("FAIL hnlu doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

fn check_rules(nlu: &NluConfig) {
    match Preprocessor::new(nlu) {
        Ok(pre) => {
            let engine = pre.time_extractor().engine();
            println!(
                "rules: {} date parsers, {} refiners",
                engine.parser_names().count(),
                engine.refiner_names().count()
            );
            println!(
                "phrases: {} data-source rules, {} cycle rules",
                pre.rules().data_source_rules().len(),
                pre.rules().cycle_rules().len()
            );
        }
        Err(e) => {
            println!("FAIL rules: {e}");
            std::process::exit(1);
        }
    }
}
