//! Result and staging file writers.

use crate::error::Result;
use crate::table::Table;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{error, info};

/// Write `data` as pretty-printed JSON (4-space indent, non-ASCII kept as-is).
///
/// Empty data (null, empty object/array/string) is refused with an error log
/// and no file is written; the return value tells whether a file was written.
/// The document is fully serialized before the file is touched.
pub fn export_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<bool> {
    let value = serde_json::to_value(data)?;
    if is_empty_value(&value) {
        error!(path = ?path, "No content to export");
        return Ok(false);
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');

    ensure_parent(path)?;
    std::fs::write(path, &buf)?;
    info!(path = ?path, "Exported JSON");
    Ok(true)
}

/// Write a table as CSV with a header row; null cells become empty fields
pub fn export_csv(table: &Table, path: &Path) -> Result<()> {
    ensure_parent(path)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    wtr.flush()?;
    info!(path = ?path, rows = table.len(), "Saved CSV");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_table;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_export_json_creates_dirs_and_indents() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested/out/report.json");

        let written = export_json(&json!({"journal": "Journal of Café", "mentions": 2}), &path)?;
        assert!(written);

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(
            content,
            "{\n    \"journal\": \"Journal of Café\",\n    \"mentions\": 2\n}\n"
        );
        Ok(())
    }

    #[test]
    fn test_export_json_refuses_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.json");

        assert!(!export_json(&json!({}), &path)?);
        assert!(!export_json(&Vec::<String>::new(), &path)?);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_export_csv_round_trip_keeps_nulls() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("staging/pubmed.csv");
        let table = Table::from_rows(
            vec!["id".into(), "title".into()],
            vec![
                vec![Some("1".into()), Some("A, B".into())],
                vec![Some("2".into()), None],
            ],
        )?;

        export_csv(&table, &path)?;
        assert_eq!(std::fs::read_to_string(&path)?, "id,title\n1,\"A, B\"\n2,\n");
        assert_eq!(load_table(&path)?, table);
        Ok(())
    }
}
