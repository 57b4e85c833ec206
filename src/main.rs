//! drug-mentions - full ETL run
//!
//! Loads the raw drug, PubMed and clinical trial files, writes the cleaned
//! staging tables and exports the drug mentions graph.
//!
//! ## Usage
//!
//! ```bash
//! drug-mentions
//! drug-mentions --data-dir ./data --debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use drug_mentions::{config::Config, logging, pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Drug mentions ETL pipeline
#[derive(Parser)]
#[command(name = "drug-mentions")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Data root holding the Raw, Staging and Result directories
    #[arg(long, default_value = drug_mentions::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_data_dir(&cli.data_dir);

    info!(data_dir = ?cli.data_dir, "Starting ETL pipeline");
    let summary = pipeline::run(&config).context("ETL pipeline aborted")?;

    info!(
        drugs = summary.drugs,
        publications = summary.publications,
        trials = summary.trials,
        linked_drugs = summary.linked_drugs,
        mentions = summary.mentions,
        graph = ?summary.graph_path,
        "ETL pipeline complete"
    );
    Ok(())
}
