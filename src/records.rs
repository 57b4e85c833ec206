//! Typed views over normalized tables.
//!
//! Publications and clinical trials share one [`Article`] shape; the only
//! difference is which column carries the title, resolved by [`Source`].

use crate::error::Result;
use crate::normalize::NULL_ID;
use crate::table::Table;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const ID_COLUMN: &str = "id";
pub const NAME_COLUMN: &str = "name";
pub const JOURNAL_COLUMN: &str = "journal";
pub const DATE_COLUMN: &str = "date";

/// Raw drug headers accepted in place of `id` / `name`
pub const DRUG_COLUMN_ALIASES: &[(&str, &str)] = &[("atccode", ID_COLUMN), ("drug", NAME_COLUMN)];

/// Mentions keyed by drug name, in drug-table order
pub type MentionsGraph = IndexMap<String, Vec<Mention>>;

/// Where a mention was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// PubMed-like article, title in `title`
    Publication,
    /// Clinical trial, title in `scientific_title`
    Trial,
}

impl Source {
    /// Name of the title-bearing column for this kind of record
    pub fn title_column(self) -> &'static str {
        match self {
            Source::Publication => "title",
            Source::Trial => "scientific_title",
        }
    }
}

/// A drug to look for
#[derive(Debug, Clone, PartialEq)]
pub struct Drug {
    pub id: String,
    pub name: Option<String>,
}

impl Drug {
    /// Read drugs from a table with `id` and `name` columns
    pub fn from_table(table: &Table) -> Result<Vec<Drug>> {
        let id = table.require_column(ID_COLUMN)?;
        let name = table.require_column(NAME_COLUMN)?;

        Ok(table
            .rows()
            .iter()
            .map(|row| Drug {
                id: row[id].clone().unwrap_or_else(|| NULL_ID.to_string()),
                name: row[name].clone(),
            })
            .collect())
    }
}

/// Rename raw drug headers (`atccode`, `drug`) to `id` / `name`
pub fn align_drug_columns(mut table: Table) -> Table {
    for (from, to) in DRUG_COLUMN_ALIASES {
        table.rename_column(from, to);
    }
    table
}

/// A publication or a trial, as seen by the linker
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub source: Source,
    pub id: String,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub date: Option<String>,
}

impl Article {
    /// Read articles of one kind. `id` and the kind's title column are
    /// required; `journal` and `date` may be absent.
    pub fn from_table(table: &Table, source: Source) -> Result<Vec<Article>> {
        let id = table.require_column(ID_COLUMN)?;
        let title = table.require_column(source.title_column())?;
        let journal = table.column_index(JOURNAL_COLUMN);
        let date = table.column_index(DATE_COLUMN);

        Ok(table
            .rows()
            .iter()
            .map(|row| Article {
                source,
                id: row[id].clone().unwrap_or_else(|| NULL_ID.to_string()),
                title: row[title].clone(),
                journal: journal.and_then(|c| row[c].clone()),
                date: date.and_then(|c| row[c].clone()),
            })
            .collect())
    }
}

/// One drug name found in one article title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub source: Source,
    pub id: String,
    pub title: String,
    pub journal: String,
    pub date: String,
}

impl Mention {
    pub fn from_article(article: &Article, title: &str) -> Self {
        Self {
            source: article.source,
            id: article.id.clone(),
            title: title.to_string(),
            journal: article.journal.clone().unwrap_or_default(),
            date: article.date.clone().unwrap_or_default(),
        }
    }
}
