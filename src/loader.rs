//! Flat file loaders.
//!
//! CSV and JSON sources are both read into a [`Table`]. Raw text is also
//! available for the repair fallback.

use crate::error::{PipelineError, Result};
use crate::table::{Cell, Table};
use std::path::Path;
use tracing::debug;

/// Read a CSV file with a header row.
///
/// Empty fields become null. Rows shorter than the header are padded with
/// null; longer rows are a shape error.
pub fn load_table(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    for (idx, column) in columns.iter().enumerate() {
        if columns[..idx].contains(column) {
            return Err(PipelineError::Shape(format!(
                "duplicate column '{}' in {:?}",
                column, path
            )));
        }
    }

    let mut table = Table::new(columns);
    let width = table.columns().len();

    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            return Err(PipelineError::Shape(format!(
                "{:?} line {}: expected {} fields, saw {}",
                path,
                record.position().map(|p| p.line()).unwrap_or_default(),
                width,
                record.len()
            )));
        }

        let mut row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        row.resize(width, None);
        table.push_row(row)?;
    }

    debug!(path = ?path, rows = table.len(), "Loaded CSV");
    Ok(table)
}

/// Read a JSON file holding a record list or a column-oriented object.
///
/// Syntax errors surface as [`PipelineError::Json`] so callers can fall back
/// to text repair.
pub fn load_json(path: &Path) -> Result<Table> {
    let text = load_text(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let table = Table::from_json_value(value)?;
    debug!(path = ?path, rows = table.len(), "Loaded JSON");
    Ok(table)
}

/// Read a whole file as text
pub fn load_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_load_table_nulls_and_padding() -> Result<()> {
        let file = write_temp("id,title,journal\n1,\"Aspirin, a study\",J1\n2,,\n3,Short\n")?;
        let table = load_table(file.path())?;

        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(0, "title"), Some("Aspirin, a study"));
        assert_eq!(table.cell(1, "title"), None);
        assert_eq!(table.cell(1, "journal"), None);
        assert_eq!(table.cell(2, "journal"), None);
        Ok(())
    }

    #[test]
    fn test_load_table_too_many_fields() -> Result<()> {
        let file = write_temp("id,title\n1,a,b\n")?;
        assert!(matches!(load_table(file.path()), Err(PipelineError::Shape(_))));
        Ok(())
    }

    #[test]
    fn test_load_table_missing_file() {
        assert!(load_table(Path::new("/nonexistent/drugs.csv")).is_err());
    }

    #[test]
    fn test_load_json_records() -> Result<()> {
        let file = write_temp(r#"[{"id": 1, "title": "A", "journal": "J"}]"#)?;
        let table = load_json(file.path())?;
        assert_eq!(table.cell(0, "id"), Some("1"));
        Ok(())
    }

    #[test]
    fn test_load_json_syntax_error_is_recoverable() -> Result<()> {
        let file = write_temp(r#"[{id: "1", title: "A",},]"#)?;
        let err = load_json(file.path()).unwrap_err();
        assert!(err.is_json_syntax());
        Ok(())
    }

    #[test]
    fn test_load_json_missing_file_is_not_recoverable() {
        let err = load_json(Path::new("/nonexistent/pubmed.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
        assert!(!err.is_json_syntax());
    }
}
