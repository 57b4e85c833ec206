//! Row/column table of nullable string cells.
//!
//! Every loader produces a [`Table`] and every normalizer consumes one, so CSV
//! and JSON sources end up in the same shape before linking. A cell is
//! `None` when the source had no value (empty CSV field, JSON `null`, or a key
//! missing from one object of a record list).

use crate::error::{PipelineError, Result};
use serde_json::{Map, Value};

/// A single table cell; `None` is null
pub type Cell = Option<String>;

/// Ordered columns plus positional rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from a header and rows, checking every row's width
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table from a list of JSON objects.
    ///
    /// Columns are the union of all keys in first-seen order; a key missing
    /// from an object yields a null cell.
    pub fn from_objects(objects: &[Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for object in objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|c| object.get(c).and_then(cell_from_value))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Build a table from parsed JSON.
    ///
    /// Accepts an array of objects (record-oriented) or an object of
    /// equal-length arrays (column-oriented).
    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let mut objects = Vec::with_capacity(items.len());
                for (idx, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(object) => objects.push(object),
                        other => {
                            return Err(PipelineError::Shape(format!(
                                "element {} is not an object: {}",
                                idx, other
                            )))
                        }
                    }
                }
                Ok(Self::from_objects(&objects))
            }
            Value::Object(map) => Self::from_column_map(map),
            other => Err(PipelineError::Shape(format!(
                "expected an array or an object, got: {}",
                other
            ))),
        }
    }

    fn from_column_map(map: Map<String, Value>) -> Result<Self> {
        let mut columns = Vec::with_capacity(map.len());
        let mut values: Vec<Vec<Value>> = Vec::with_capacity(map.len());

        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    if let Some(first) = values.first() {
                        if first.len() != items.len() {
                            return Err(PipelineError::Shape(format!(
                                "all arrays must be of the same length (column '{}' has {}, expected {})",
                                key,
                                items.len(),
                                first.len()
                            )));
                        }
                    }
                    columns.push(key);
                    values.push(items);
                }
                _ => {
                    return Err(PipelineError::Shape(format!(
                        "column '{}' is not an array",
                        key
                    )))
                }
            }
        }

        let height = values.first().map(Vec::len).unwrap_or(0);
        let rows = (0..height)
            .map(|r| values.iter().map(|col| cell_from_value(&col[r])).collect())
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column position, or `MissingColumn`
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::missing_column(name))
    }

    /// Cell at `row` in column `name`; `None` for null, unknown column or row
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Append a row; its width must match the header
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::Shape(format!(
                "row {} has {} fields, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Replace every cell of column `col` with `f(cell)`
    pub fn map_column<F>(&mut self, col: usize, mut f: F)
    where
        F: FnMut(Option<&str>) -> Cell,
    {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(col) {
                *cell = f(cell.as_deref());
            }
        }
    }

    /// Keep only rows for which `keep` returns true, preserving order
    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Vec<Cell>) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Rename a column. Does nothing when `from` is absent or `to` already exists.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if self.has_column(to) {
            return false;
        }
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Append `other`'s rows after this table's rows.
    ///
    /// Columns are aligned by name; the result carries the union of both
    /// headers and fills cells a side lacks with null. Two non-empty headers
    /// with no column in common describe different entities and are refused.
    pub fn concat(self, other: Table) -> Result<Table> {
        if !self.columns.is_empty()
            && !other.columns.is_empty()
            && !other.columns.iter().any(|c| self.has_column(c))
        {
            return Err(PipelineError::Concat(format!(
                "no shared columns between [{}] and [{}]",
                self.columns.join(", "),
                other.columns.join(", ")
            )));
        }

        let mut columns = self.columns.clone();
        for column in &other.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        let mut rows = Vec::with_capacity(self.rows.len() + other.rows.len());
        for table in [self, other] {
            let positions: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|p| p.and_then(|i| row[i].clone()))
                        .collect(),
                );
            }
        }

        Ok(Table { columns, rows })
    }
}

/// Convert a JSON value to a cell: strings as-is, `null` as null,
/// anything else by its JSON text
pub fn cell_from_value(value: &Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_json_records_unions_keys() -> Result<()> {
        let table = Table::from_json_value(json!([
            {"id": 1, "title": "A"},
            {"id": "2", "journal": "J", "title": null}
        ]))?;
        assert_eq!(table.columns(), header(&["id", "title", "journal"]).as_slice());
        assert_eq!(table.cell(0, "id"), Some("1"));
        assert_eq!(table.cell(0, "journal"), None);
        assert_eq!(table.cell(1, "title"), None);
        assert_eq!(table.cell(1, "journal"), Some("J"));
        Ok(())
    }

    #[test]
    fn test_from_json_columns() -> Result<()> {
        let table = Table::from_json_value(json!({"id": ["1", "2"], "name": ["a", null]}))?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "id"), Some("2"));
        assert_eq!(table.cell(1, "name"), None);
        Ok(())
    }

    #[test]
    fn test_from_json_ragged_columns_fails() {
        let err = Table::from_json_value(json!({"a": [1, 2], "b": [1]})).unwrap_err();
        assert!(matches!(err, PipelineError::Shape(_)));
    }

    #[test]
    fn test_from_json_scalar_fails() {
        assert!(Table::from_json_value(json!({"a": 1})).is_err());
        assert!(Table::from_json_value(json!([1, 2])).is_err());
        assert!(Table::from_json_value(json!("text")).is_err());
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::new(header(&["a", "b"]));
        assert!(table.push_row(vec![Some("1".into())]).is_err());
        assert!(table.push_row(vec![Some("1".into()), None]).is_ok());
    }

    #[test]
    fn test_concat_aligns_by_name() -> Result<()> {
        let csv = Table::from_rows(
            header(&["id", "title", "date"]),
            vec![vec![Some("1".into()), Some("A".into()), Some("2020-01-01".into())]],
        )?;
        let json = Table::from_rows(
            header(&["title", "id", "journal"]),
            vec![vec![Some("B".into()), Some("2".into()), Some("J".into())]],
        )?;

        let combined = csv.concat(json)?;
        assert_eq!(combined.columns(), header(&["id", "title", "date", "journal"]).as_slice());
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.cell(0, "journal"), None);
        assert_eq!(combined.cell(1, "id"), Some("2"));
        assert_eq!(combined.cell(1, "date"), None);
        Ok(())
    }

    #[test]
    fn test_concat_with_empty_side() -> Result<()> {
        let csv = Table::from_rows(header(&["id"]), vec![vec![Some("1".into())]])?;
        let combined = csv.concat(Table::default())?;
        assert_eq!(combined.len(), 1);
        Ok(())
    }

    #[test]
    fn test_concat_disjoint_fails() {
        let a = Table::new(header(&["id"]));
        let b = Table::new(header(&["name"]));
        assert!(matches!(a.concat(b), Err(PipelineError::Concat(_))));
    }

    #[test]
    fn test_rename_column() {
        let mut table = Table::new(header(&["atccode", "drug"]));
        assert!(table.rename_column("atccode", "id"));
        assert!(!table.rename_column("missing", "x"));
        assert!(!table.rename_column("drug", "id"));
        assert_eq!(table.columns(), header(&["id", "drug"]).as_slice());
    }
}
