//! drug-mentions-ad-hoc - most mentioned journal report
//!
//! Reads the exported mentions graph and writes the journal that mentions
//! the most distinct drugs.

use anyhow::{Context, Result};
use clap::Parser;
use drug_mentions::{ad_hoc, config::Config, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Report the journal mentioning the most distinct drugs
#[derive(Parser)]
#[command(name = "drug-mentions-ad-hoc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Data root holding the Result directory
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

    let report = ad_hoc::export_most_mentioned_journal(&config)
        .context("Ad-hoc report aborted")?;

    info!(
        journal = %report.journal,
        mentions = report.mentions,
        output = ?config.ad_hoc_path(),
        "Ad-hoc report complete"
    );
    Ok(())
}
