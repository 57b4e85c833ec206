//! End-to-end ETL pipeline.
//!
//! Orchestrates one full run:
//!   1. Load the PubMed JSON source, repairing it if it is not valid JSON
//!   2. Load the drug, PubMed and clinical trial CSV sources
//!   3. Append the JSON publications after the CSV ones
//!   4. Normalize every table, then save the staging CSVs
//!   5. Link drugs to publication and trial titles
//!   6. Export the mentions graph
//!
//! Every failure is returned as a [`PipelineError`] tagged with its stage.
//! Nothing is written to the result area unless the graph was built.

use crate::config::Config;
use crate::error::{PipelineError, Result, Stage, StageExt};
use crate::exporter::{export_csv, export_json};
use crate::linker::build_mentions_graph;
use crate::loader::{load_json, load_table, load_text};
use crate::normalize::{
    dedup_by_id, drop_incomplete_rows, sanitize_titles, standardize_dates, stringify_ids,
};
use crate::records::{
    align_drug_columns, Article, Drug, MentionsGraph, Source, DATE_COLUMN, ID_COLUMN,
    JOURNAL_COLUMN, NAME_COLUMN,
};
use crate::repair::correct_json_text;
use crate::table::Table;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Normalized tables, as written to the staging area
#[derive(Debug, Clone)]
pub struct StagedTables {
    pub drugs: Table,
    pub publications: Table,
    pub trials: Table,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub drugs: usize,
    pub publications: usize,
    pub trials: usize,
    pub linked_drugs: usize,
    pub mentions: usize,
    pub graph_path: PathBuf,
}

/// Load the publication JSON source.
///
/// A JSON syntax error triggers text repair on the raw file; any other
/// failure, or a failed repair, is fatal.
pub fn load_publication_json(path: &Path) -> Result<Table> {
    match load_json(path) {
        Ok(table) => Ok(table),
        Err(e) if e.is_json_syntax() => {
            info!(path = ?path, error = %e, "Invalid JSON, attempting text repair");
            let repaired = load_text(path).and_then(|text| correct_json_text(&text));
            repaired.in_stage(Stage::Repair)
        }
        Err(e) => Err(PipelineError::Stage {
            stage: Stage::Load,
            source: Box::new(e),
        }),
    }
}

/// Drugs: align headers, stringify ids, keep the first row per id
pub fn normalize_drugs(table: Table) -> Result<Table> {
    let table = align_drug_columns(table);
    table.require_column(NAME_COLUMN)?;
    let table = stringify_ids(table, ID_COLUMN);
    dedup_by_id(table, ID_COLUMN)
}

/// Publications and trials: ids, dates, titles, incomplete rows, duplicates
pub fn normalize_articles(table: Table, source: Source) -> Result<Table> {
    let title = source.title_column();
    let table = stringify_ids(table, ID_COLUMN);
    let table = standardize_dates(table, DATE_COLUMN);
    let table = sanitize_titles(table, title);
    let table = drop_incomplete_rows(table, title, JOURNAL_COLUMN)?;
    dedup_by_id(table, ID_COLUMN)
}

/// Load, combine and normalize all sources, then save the staging tables.
pub fn load_and_transform(config: &Config) -> Result<StagedTables> {
    let pubmed_json = load_publication_json(&config.src_pubmed_json_path())?;

    info!("Loading CSV sources");
    let drugs = load_table(&config.src_drugs_path()).in_stage(Stage::Load)?;
    let pubmed_csv = load_table(&config.src_pubmed_path()).in_stage(Stage::Load)?;
    let trials = load_table(&config.src_clinical_trials_path()).in_stage(Stage::Load)?;

    info!(
        csv_rows = pubmed_csv.len(),
        json_rows = pubmed_json.len(),
        "Combining PubMed sources"
    );
    let publications = pubmed_csv.concat(pubmed_json).in_stage(Stage::Combine)?;

    info!("Normalizing tables");
    let staged = StagedTables {
        drugs: normalize_drugs(drugs).in_stage(Stage::Normalize)?,
        publications: normalize_articles(publications, Source::Publication)
            .in_stage(Stage::Normalize)?,
        trials: normalize_articles(trials, Source::Trial).in_stage(Stage::Normalize)?,
    };

    export_csv(&staged.drugs, &config.drugs_path()).in_stage(Stage::Export)?;
    export_csv(&staged.publications, &config.pubmed_path()).in_stage(Stage::Export)?;
    export_csv(&staged.trials, &config.clinical_trials_path()).in_stage(Stage::Export)?;

    info!(
        drugs = staged.drugs.len(),
        publications = staged.publications.len(),
        trials = staged.trials.len(),
        "Staging tables saved"
    );
    Ok(staged)
}

/// Link staged drugs to staged publications and trials
pub fn build_graph(staged: &StagedTables) -> Result<MentionsGraph> {
    let link = || -> Result<MentionsGraph> {
        let drugs = Drug::from_table(&staged.drugs)?;
        let publications = Article::from_table(&staged.publications, Source::Publication)?;
        let trials = Article::from_table(&staged.trials, Source::Trial)?;
        build_mentions_graph(&drugs, &publications, &trials)
    };
    link().in_stage(Stage::Link)
}

/// Run the whole pipeline and export the mentions graph.
///
/// An empty graph is an error and leaves no graph file behind.
pub fn run(config: &Config) -> Result<PipelineSummary> {
    let staged = load_and_transform(config)?;

    info!("Building drug mentions graph");
    let graph = build_graph(&staged)?;
    if graph.is_empty() {
        warn!("No drug is mentioned in any title");
        return Err(PipelineError::EmptyGraph);
    }

    let graph_path = config.graph_path();
    export_json(&graph, &graph_path).in_stage(Stage::Export)?;

    Ok(PipelineSummary {
        drugs: staged.drugs.len(),
        publications: staged.publications.len(),
        trials: staged.trials.len(),
        linked_drugs: graph.len(),
        mentions: graph.values().map(Vec::len).sum(),
        graph_path,
    })
}
