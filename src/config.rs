//! Data directory layout.
//!
//! Raw inputs, staging tables and results all live under one data root.

use std::path::{Path, PathBuf};

/// Default data root, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

pub const SRC_DRUGS_FILE: &str = "Src_drugs.csv";
pub const SRC_PUBMED_FILE: &str = "Src_pubmed.csv";
pub const SRC_PUBMED_JSON_FILE: &str = "Src_pubmed.json";
pub const SRC_CLINICAL_TRIALS_FILE: &str = "Src_clinical_trials.csv";

pub const DRUGS_FILE: &str = "drugs.csv";
pub const PUBMED_FILE: &str = "pubmed.csv";
pub const CLINICAL_TRIALS_FILE: &str = "clinical_trials.csv";

pub const LINK_GRAPH_DIR: &str = "link_graph";
pub const GRAPH_FILE: &str = "drug_mentions_graph.json";
pub const AD_HOC_DIR: &str = "ad_hoc";
pub const AD_HOC_FILE: &str = "most_mentioned_journal.json";

/// Paths used by the pipeline and the ad-hoc report
#[derive(Debug, Clone)]
pub struct Config {
    pub raw_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub result_dir: PathBuf,
}

impl Config {
    /// Build the standard `Raw` / `Staging` / `Result` layout under `root`
    pub fn from_data_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            raw_dir: root.join("Raw"),
            staging_dir: root.join("Staging"),
            result_dir: root.join("Result"),
        }
    }

    pub fn src_drugs_path(&self) -> PathBuf {
        self.raw_dir.join(SRC_DRUGS_FILE)
    }

    pub fn src_pubmed_path(&self) -> PathBuf {
        self.raw_dir.join(SRC_PUBMED_FILE)
    }

    pub fn src_pubmed_json_path(&self) -> PathBuf {
        self.raw_dir.join(SRC_PUBMED_JSON_FILE)
    }

    pub fn src_clinical_trials_path(&self) -> PathBuf {
        self.raw_dir.join(SRC_CLINICAL_TRIALS_FILE)
    }

    pub fn drugs_path(&self) -> PathBuf {
        self.staging_dir.join(DRUGS_FILE)
    }

    pub fn pubmed_path(&self) -> PathBuf {
        self.staging_dir.join(PUBMED_FILE)
    }

    pub fn clinical_trials_path(&self) -> PathBuf {
        self.staging_dir.join(CLINICAL_TRIALS_FILE)
    }

    /// Mentions graph output: `Result/link_graph/drug_mentions_graph.json`
    pub fn graph_path(&self) -> PathBuf {
        self.result_dir.join(LINK_GRAPH_DIR).join(GRAPH_FILE)
    }

    /// Ad-hoc report output: `Result/ad_hoc/most_mentioned_journal.json`
    pub fn ad_hoc_path(&self) -> PathBuf {
        self.result_dir.join(AD_HOC_DIR).join(AD_HOC_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_data_dir(DEFAULT_DATA_DIR)
    }
}
