mod cmd;
mod logging;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hnlu", version, about = "Turn dictated health-data questions into structured queries")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print the resolved settings
    Doctor,

    /// Preprocess sentences and print their variables
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Sentences to read (one per argument); read from stdin when omitted
    pub sentences: Vec<String>,

    /// Reference date for relative expressions (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Seed placeholder tokens for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Parse(args) => {
            cmd::parse::run(cli.config.as_deref(), cli.profile.as_deref(), &args)
        }
    }
}
