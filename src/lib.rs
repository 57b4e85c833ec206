//! # drug-mentions
//!
//! Batch ETL pipeline linking drugs to the publications and clinical trials
//! whose titles mention them.
//!
//! ## Modules
//!
//! - [`loader`] - CSV / JSON / raw text loading into a [`table::Table`]
//! - [`repair`] - Recovery of near-JSON publication exports
//! - [`normalize`] - Date, id and title cleaning, incomplete row and duplicate removal
//! - [`linker`] - Drug name matching and mentions graph construction
//! - [`pipeline`] - Full run: load, repair, normalize, link, export
//! - [`ad_hoc`] - Journal mentioning the most distinct drugs
//! - [`exporter`] - JSON and CSV writers
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drug_mentions::{ad_hoc, config::Config, pipeline};
//!
//! fn main() -> drug_mentions::Result<()> {
//!     let config = Config::default();
//!     let summary = pipeline::run(&config)?;
//!     println!("Linked {} drugs", summary.linked_drugs);
//!     let report = ad_hoc::export_most_mentioned_journal(&config)?;
//!     println!("{} mentions {} drugs", report.journal, report.mentions);
//!     Ok(())
//! }
//! ```

pub mod ad_hoc;
pub mod config;
pub mod error;
pub mod exporter;
pub mod linker;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod records;
pub mod repair;
pub mod table;

pub use error::{PipelineError, Result};
