//! Custom error types for drug-mentions.
//!
//! Every fallible function in the library returns `Result<T, PipelineError>`.
//! The binaries are the only place where an error turns into a process exit.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON syntax or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Text repair could not produce valid JSON
    #[error("Unrecoverable JSON input after repair: {0}")]
    Repair(String),

    /// Data parsed but does not have a tabular shape
    #[error("Shape error: {0}")]
    Shape(String),

    /// A column needed by an operation is absent
    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    /// Two tables cannot be combined
    #[error("Cannot combine tables: {0}")]
    Concat(String),

    /// Drug name pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// No drug was mentioned anywhere
    #[error("Mentions graph is empty, nothing to export")]
    EmptyGraph,

    /// The graph holds no journal to rank
    #[error("No journal found in mentions graph")]
    NoJournal,

    /// A pipeline stage failed
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<PipelineError>,
    },
}

/// Pipeline stage names, used to give fatal errors their context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Repair,
    Combine,
    Normalize,
    Link,
    Export,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Repair => "repair",
            Stage::Combine => "combine",
            Stage::Normalize => "normalize",
            Stage::Link => "link",
            Stage::Export => "export",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// Result type alias using `PipelineError`
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for tagging a failure with the stage it happened in
pub trait StageExt<T> {
    fn in_stage(self, stage: Stage) -> Result<T>;
}

impl<T> StageExt<T> for Result<T> {
    fn in_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| PipelineError::Stage {
            stage,
            source: Box::new(e),
        })
    }
}

impl PipelineError {
    /// True for JSON syntax errors, the only failure Text Repair can recover from
    pub fn is_json_syntax(&self) -> bool {
        match self {
            PipelineError::Json(e) => e.is_syntax() || e.is_eof(),
            _ => false,
        }
    }

    pub(crate) fn missing_column(column: &str) -> Self {
        PipelineError::MissingColumn {
            column: column.to_string(),
        }
    }
}
