//! Ad-hoc analysis over the exported mentions graph.
//!
//! Finds the journal that mentions the largest number of distinct drugs.

use crate::config::Config;
use crate::error::{PipelineError, Result, Stage, StageExt};
use crate::exporter::export_json;
use crate::loader::load_text;
use crate::records::JOURNAL_COLUMN;
use crate::table::Table;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Column holding the drug key once the graph is flattened
pub const DRUG_KEY_COLUMN: &str = "categorie";

/// Journal with the most distinct drug mentions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalReport {
    pub journal: String,
    pub mentions: usize,
}

/// Flatten a `{drug: [mention, ...]}` document into rows, adding the drug
/// key as [`DRUG_KEY_COLUMN`]. Returns `None` when the document does not
/// have that shape.
pub fn flatten_graph(value: &Value) -> Option<Table> {
    let graph = value.as_object()?;

    let mut rows: Vec<Map<String, Value>> = Vec::new();
    for (drug, mentions) in graph {
        for mention in mentions.as_array()? {
            let mut row = mention.as_object()?.clone();
            row.insert(DRUG_KEY_COLUMN.to_string(), Value::String(drug.clone()));
            rows.push(row);
        }
    }

    Some(Table::from_objects(&rows))
}

/// Turn the parsed graph file into rows. The graph shape is flattened;
/// anything else goes through the plain tabular conversion.
pub fn graph_table_from_value(value: Value) -> Result<Table> {
    match flatten_graph(&value) {
        Some(table) => Ok(table),
        None => {
            debug!("Graph file is not drug-keyed, reading it as a table");
            Table::from_json_value(value)
        }
    }
}

/// Read the exported graph file as rows
pub fn load_graph_table(path: &Path) -> Result<Table> {
    let text = load_text(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let table = graph_table_from_value(value)?;
    info!(path = ?path, rows = table.len(), "Mentions graph loaded");
    Ok(table)
}

/// Count distinct drugs per journal and return the top journal.
///
/// Rows with a null journal are ignored. On a tie the journal seen first
/// wins.
pub fn most_mentioned_journal(table: &Table) -> Result<JournalReport> {
    if table.is_empty() {
        return Err(PipelineError::EmptyGraph);
    }
    let journal = table.require_column(JOURNAL_COLUMN)?;
    let drug = table.require_column(DRUG_KEY_COLUMN)?;

    let mut drugs_by_journal: IndexMap<&str, HashSet<&str>> = IndexMap::new();
    for row in table.rows() {
        let Some(name) = row[journal].as_deref() else {
            continue;
        };
        let drugs = drugs_by_journal.entry(name).or_default();
        if let Some(key) = row[drug].as_deref() {
            drugs.insert(key);
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, drugs) in &drugs_by_journal {
        let better = match best {
            Some((_, count)) => drugs.len() > count,
            None => true,
        };
        if better {
            best = Some((*name, drugs.len()));
        }
    }

    best.map(|(journal, mentions)| JournalReport {
        journal: journal.to_string(),
        mentions,
    })
    .ok_or(PipelineError::NoJournal)
}

/// Compute the report from the exported graph and export it
pub fn export_most_mentioned_journal(config: &Config) -> Result<JournalReport> {
    let table = load_graph_table(&config.graph_path()).in_stage(Stage::Load)?;
    let report = most_mentioned_journal(&table).in_stage(Stage::Report)?;

    info!(
        journal = %report.journal,
        mentions = report.mentions,
        "Most mentioned journal"
    );

    let path = config.ad_hoc_path();
    export_json(&report, &path).in_stage(Stage::Export)?;
    Ok(report)
}
