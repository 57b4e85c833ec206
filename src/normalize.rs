//! Column-level cleaning rules applied before linking.
//!
//! Each normalizer takes a table by value and hands it back transformed.
//! Only [`drop_incomplete_rows`] and [`dedup_by_id`] remove rows, and the
//! rows they keep stay in their original order.

use crate::error::Result;
use crate::table::Table;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// Canonical text for a null id
pub const NULL_ID: &str = "None";

/// Canonical output date format
const CANONICAL_DATE: &str = "%Y-%m-%d";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Give every id cell a string value; nulls become [`NULL_ID`]
pub fn stringify_ids(mut table: Table, column: &str) -> Table {
    let Some(col) = table.column_index(column) else {
        warn!(column, "Id column not found, left unchanged");
        return table;
    };

    table.map_column(col, |cell| {
        Some(cell.map(str::to_string).unwrap_or_else(|| NULL_ID.to_string()))
    });
    table
}

/// Map a raw date to `YYYY-MM-DD`, or `""` when it cannot be read.
///
/// The separator decides the format: `/` is `day/month/year`, `-` is
/// `year-month-day` then `day-month-year`, a space is `day MonthName year`.
pub fn canonicalize_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let parsed = if raw.contains('/') {
        parse_date(raw, "%d/%m/%Y")
    } else if raw.contains('-') {
        parse_date(raw, "%Y-%m-%d").or_else(|| parse_date(raw, "%d-%m-%Y"))
    } else if raw.contains(' ') {
        parse_date(raw, "%d %B %Y")
    } else {
        None
    };

    match parsed {
        Some(date) => date.format(CANONICAL_DATE).to_string(),
        None => {
            if !raw.is_empty() {
                debug!(value = raw, "Unrecognized date, cleared");
            }
            String::new()
        }
    }
}

fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    if !has_date_shape(raw, format) {
        return None;
    }
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .filter(|d| d.year() >= 1)
}

/// Check `raw` field by field before handing it to chrono, which is lenient
/// about signs, missing spaces and abbreviated month names.
///
/// `%d` and `%m` take one or two digits, `%Y` exactly four, `%B` a full
/// English month name in any case. A space in the format needs at least one
/// whitespace character; any other separator must appear literally.
fn has_date_shape(raw: &str, format: &str) -> bool {
    let (fields, parts): (Vec<&str>, Vec<&str>) = if format.contains(' ') {
        if raw.trim() != raw {
            return false;
        }
        (format.split(' ').collect(), raw.split_whitespace().collect())
    } else {
        let Some(sep) = format.chars().find(|c| *c != '%' && !c.is_ascii_alphabetic()) else {
            return false;
        };
        (format.split(sep).collect(), raw.split(sep).collect())
    };

    fields.len() == parts.len()
        && fields.iter().zip(&parts).all(|(field, part)| match *field {
            "%d" | "%m" => is_digits(part, 1..=2),
            "%Y" => is_digits(part, 4..=4),
            "%B" => MONTH_NAMES.iter().any(|m| m.eq_ignore_ascii_case(part)),
            _ => false,
        })
}

fn is_digits(text: &str, len: RangeInclusive<usize>) -> bool {
    len.contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Canonicalize every cell of a date column
pub fn standardize_dates(mut table: Table, column: &str) -> Table {
    let Some(col) = table.column_index(column) else {
        warn!(column, "Date column not found, left unchanged");
        return table;
    };

    table.map_column(col, |cell| Some(canonicalize_date(cell)));
    table
}

/// Clean one title: strip non-ASCII, strip punctuation other than `-` and
/// `_`, title-case, then trim and collapse whitespace.
pub fn sanitize_title(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(char::is_ascii)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || is_title_space(*c))
        .collect();

    title_case(&stripped)
        .split(is_title_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// ASCII whitespace, including vertical tab and the `\x1c`-`\x1f` separators
fn is_title_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b' || ('\x1c'..='\x1f').contains(&c)
}

/// Upper-case a letter that follows a non-letter, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            if prev_is_letter {
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c.to_ascii_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Sanitize every non-null cell of a title column; nulls stay null
pub fn sanitize_titles(mut table: Table, column: &str) -> Table {
    let Some(col) = table.column_index(column) else {
        warn!(column, "Title column not found, left unchanged");
        return table;
    };

    table.map_column(col, |cell| cell.map(sanitize_title));
    table
}

/// Remove rows whose title or journal is null. Empty strings are kept.
pub fn drop_incomplete_rows(
    mut table: Table,
    title_column: &str,
    journal_column: &str,
) -> Result<Table> {
    let title = table.require_column(title_column)?;
    let journal = table.require_column(journal_column)?;

    let before = table.len();
    table.retain_rows(|row| row[title].is_some() && row[journal].is_some());

    if table.len() < before {
        info!(
            removed = before - table.len(),
            title_column, journal_column, "Dropped incomplete rows"
        );
    }
    Ok(table)
}

/// Keep the first row for each id; the surviving rows are renumbered from zero
pub fn dedup_by_id(mut table: Table, id_column: &str) -> Result<Table> {
    let id = table.require_column(id_column)?;

    let before = table.len();
    let mut seen = HashSet::new();
    table.retain_rows(|row| seen.insert(row[id].clone()));

    if table.len() < before {
        info!(removed = before - table.len(), id_column, "Removed duplicate ids");
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::table::Cell;

    fn single_column(name: &str, cells: &[Option<&str>]) -> Table {
        let rows = cells.iter().map(|c| vec![c.map(str::to_string)]).collect();
        Table::from_rows(vec![name.to_string()], rows).expect("valid rows")
    }

    fn column(table: &Table, name: &str) -> Vec<Cell> {
        (0..table.len())
            .map(|r| table.cell(r, name).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_canonicalize_date_rules() {
        assert_eq!(canonicalize_date(Some("01/02/2020")), "2020-02-01");
        assert_eq!(canonicalize_date(Some("2020-03-04")), "2020-03-04");
        assert_eq!(canonicalize_date(Some("15 April 2021")), "2021-04-15");
        assert_eq!(canonicalize_date(None), "");
        assert_eq!(canonicalize_date(Some("")), "");
    }

    #[test]
    fn test_canonicalize_date_fallbacks() {
        assert_eq!(canonicalize_date(Some("25-05-2020")), "2020-05-25");
        assert_eq!(canonicalize_date(Some("1/1/2019")), "2019-01-01");
        assert_eq!(canonicalize_date(Some("31/02/2020")), "");
        assert_eq!(canonicalize_date(Some("2020-13-45")), "");
        assert_eq!(canonicalize_date(Some("1 Brumaire 2020")), "");
        assert_eq!(canonicalize_date(Some("20200101")), "");
        assert_eq!(canonicalize_date(Some("15 Apr 2021")), "");
        assert_eq!(canonicalize_date(Some("15April 2021")), "");
        assert_eq!(canonicalize_date(Some("+2020-01-01")), "");
        assert_eq!(canonicalize_date(Some("20-01-01")), "");
        assert_eq!(canonicalize_date(Some(" 01/02/2020")), "");
    }

    #[test]
    fn test_canonicalize_date_month_names() {
        assert_eq!(canonicalize_date(Some("15 april 2021")), "2021-04-15");
        assert_eq!(canonicalize_date(Some("3  SEPTEMBER\t2019")), "2019-09-03");
        assert_eq!(canonicalize_date(Some("3 Sept 2019")), "");
    }

    #[test]
    fn test_standardize_dates_column() {
        let table = single_column(
            "date",
            &[Some("01/02/2020"), Some("2020-03-04"), Some("15 April 2021"), None, Some("")],
        );
        let table = standardize_dates(table, "date");
        assert_eq!(
            column(&table, "date"),
            vec![
                Some("2020-02-01".to_string()),
                Some("2020-03-04".to_string()),
                Some("2021-04-15".to_string()),
                Some(String::new()),
                Some(String::new()),
            ]
        );
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("hello! world?"), "Hello World");
        assert_eq!(sanitize_title("Cafe au lait"), "Cafe Au Lait");
        assert_eq!(sanitize_title("  Café  crème brûlée "), "Caf Crme Brle");
        assert_eq!(sanitize_title("a\x0bb c\x1fd"), "A B C D");
        assert_eq!(sanitize_title("\x1cleading\x1d and\x1e"), "Leading And");
        assert_eq!(
            sanitize_title("DIPHENHYDRAMINE: a 100mg double-blind_trial"),
            "Diphenhydramine A 100Mg Double-Blind_Trial"
        );
    }

    #[test]
    fn test_sanitize_titles_skips_nulls() {
        let table = single_column("title", &[Some("hello! world?"), None]);
        let table = sanitize_titles(table, "title");
        assert_eq!(column(&table, "title"), vec![Some("Hello World".to_string()), None]);
    }

    #[test]
    fn test_stringify_ids() {
        let table = single_column("id", &[Some("123"), None]);
        let table = stringify_ids(table, "id");
        assert_eq!(
            column(&table, "id"),
            vec![Some("123".to_string()), Some(NULL_ID.to_string())]
        );
    }

    #[test]
    fn test_missing_column_is_left_unchanged() {
        let table = single_column("other", &[Some("x")]);
        let unchanged = stringify_ids(table.clone(), "id");
        let unchanged = sanitize_titles(unchanged, "title");
        let unchanged = standardize_dates(unchanged, "date");
        assert_eq!(unchanged, table);
    }

    #[test]
    fn test_drop_incomplete_rows() -> Result<()> {
        let table = Table::from_rows(
            vec!["title".into(), "journal".into()],
            vec![
                vec![Some("Test Title".into()), Some("Journal A".into())],
                vec![None, Some("Journal B".into())],
                vec![Some("Another Title".into()), None],
                vec![Some(String::new()), Some("Journal C".into())],
            ],
        )?;

        let filtered = drop_incomplete_rows(table, "title", "journal")?;
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.cell(0, "title"), Some("Test Title"));
        assert_eq!(filtered.cell(1, "title"), Some(""));
        Ok(())
    }

    #[test]
    fn test_drop_incomplete_rows_requires_columns() {
        let table = single_column("title", &[Some("x")]);
        let err = drop_incomplete_rows(table, "title", "journal").unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }

    #[test]
    fn test_dedup_by_id() -> Result<()> {
        let table = Table::from_rows(
            vec!["id".into(), "value".into()],
            vec![
                vec![Some("1".into()), Some("10".into())],
                vec![Some("1".into()), Some("11".into())],
                vec![Some("2".into()), Some("20".into())],
            ],
        )?;

        let deduped = dedup_by_id(table, "id")?;
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped.cell(0, "id"), Some("1"));
        assert_eq!(deduped.cell(0, "value"), Some("10"));
        assert_eq!(deduped.cell(1, "id"), Some("2"));
        Ok(())
    }
}
