//! `hnlu parse`: run the preprocessor on sentences.

use std::io::{self, BufRead};
use std::path::Path;

use chrono::Local;
use color_eyre::eyre::{eyre, Result, WrapErr};
use healthnlu_core::config::loader::ConfigLoader;
use healthnlu_core::{PreprocessOptions, PreprocessResult, Preprocessor, VariableBinding};
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, info};

use crate::logging;
use crate::ParseArgs;

/// Row of the variables table.
#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Phrase")]
    phrase: String,
    #[tabled(rename = "Certain")]
    certain: String,
    #[tabled(rename = "Prep")]
    preposition: String,
}

impl From<&VariableBinding> for VariableRow {
    fn from(binding: &VariableBinding) -> Self {
        let extra = binding.extra.as_ref();
        Self {
            token: binding.id.clone(),
            kind: binding.kind.to_string(),
            value: binding.value.to_string(),
            phrase: binding.original_text.clone(),
            certain: extra.map_or_else(String::new, |e| e.certain.to_string()),
            preposition: extra.and_then(|e| e.preposition.clone()).unwrap_or_default(),
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &ParseArgs) -> Result<()> {
    let cfg = ConfigLoader::load_or_default(config, profile).map_err(|e| {
        eyre!("Configuration error: {e}\nRun 'hnlu doctor' to diagnose.")
    })?;
    logging::init(&cfg.logging)?;

    let pre = Preprocessor::new(&cfg.nlu).wrap_err("failed to build the preprocessor")?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let mut options = PreprocessOptions::new(today)
        .with_measure_unit(cfg.measure_unit)
        .with_data_initial_date(cfg.data_initial_date)
        .with_goals(&cfg.goals);
    if let Some(seed) = args.seed {
        options = options.with_token_seed(seed);
    }
    debug!(%today, profile = %cfg.active_profile, "preprocessor ready");

    let sentences = if args.sentences.is_empty() {
        read_stdin()?
    } else {
        args.sentences.clone()
    };

    let results: Vec<PreprocessResult> =
        sentences.iter().map(|s| pre.preprocess(s, &options)).collect();
    info!(count = results.len(), "sentences processed");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (i, result) in results.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_result(result);
        }
    }
    Ok(())
}

fn read_stdin() -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut sentences = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.wrap_err("failed to read stdin")?;
        if !line.trim().is_empty() {
            sentences.push(line);
        }
    }
    Ok(sentences)
}

fn print_result(result: &PreprocessResult) {
    println!("sentence:  {}", result.original_text);
    println!("processed: {}", result.processed_text);
    println!("intent:    {}", result.intent);

    let rows: Vec<VariableRow> =
        result.bindings_in_order().into_iter().map(VariableRow::from).collect();
    if rows.is_empty() {
        println!("(no variables)");
        return;
    }
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
}
