//! Best-effort recovery of near-JSON text.
//!
//! Handles the usual hand-edited export damage: unquoted object keys,
//! trailing commas, and a missing enclosing array. Anything else is
//! unrecoverable and reported as [`PipelineError::Repair`].

use crate::error::{PipelineError, Result};
use crate::table::Table;
use regex::Regex;
use serde_json::Value;
use tracing::info;

/// Bare identifier followed by optional whitespace and a colon
const BARE_KEY_PATTERN: &str = r"\b(\w+)\b\s*:";

/// Comma directly before a closing bracket or brace
const TRAILING_COMMA_PATTERN: &str = r",\s*([\]}])";

/// Wrap unquoted object keys in double quotes. Keys already opened by a
/// quote are left alone.
pub fn quote_bare_keys(text: &str) -> Result<String> {
    let bare_key = Regex::new(BARE_KEY_PATTERN)?;
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for caps in bare_key.captures_iter(text) {
        let Some(key) = caps.get(1) else { continue };
        if text[..key.start()].ends_with('"') {
            continue;
        }
        out.push_str(&text[last..key.start()]);
        out.push('"');
        out.push_str(key.as_str());
        out.push('"');
        last = key.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

/// Drop commas that directly precede `]` or `}`
pub fn strip_trailing_commas(text: &str) -> Result<String> {
    let trailing_comma = Regex::new(TRAILING_COMMA_PATTERN)?;
    Ok(trailing_comma.replace_all(text, "$1").into_owned())
}

/// Apply the textual fixes and make sure the result is an array
pub fn repair_text(raw: &str) -> Result<String> {
    let fixed = strip_trailing_commas(&quote_bare_keys(raw)?)?;
    let trimmed = fixed.trim();
    if trimmed.starts_with('[') {
        Ok(fixed)
    } else {
        Ok(format!("[{}]", trimmed))
    }
}

/// Repair near-JSON text and load it as a table.
///
/// Objects whose `id` is present and equal to `""` are dropped. A parse
/// failure after repair is fatal; no other heuristic is tried.
pub fn correct_json_text(raw: &str) -> Result<Table> {
    let repaired = repair_text(raw)?;

    let value: Value = serde_json::from_str(&repaired)
        .map_err(|e| PipelineError::Repair(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(PipelineError::Repair(
            "repaired document is not an array".to_string(),
        ));
    };

    let mut objects = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for (idx, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(PipelineError::Repair(format!(
                "element {} is not an object",
                idx
            )));
        };
        if object.get("id").and_then(Value::as_str) == Some("") {
            dropped += 1;
            continue;
        }
        objects.push(object);
    }

    info!(
        records = objects.len(),
        dropped_empty_ids = dropped,
        "JSON repaired and loaded"
    );
    Ok(Table::from_objects(&objects))
}
