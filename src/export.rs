//! CSV payload for the "Export" action.
//!
//! Text cells are wrapped in double quotes without escaping; embedded quotes
//! and commas pass through as-is. Downstream consumers read this exact shape.

use crate::{column::ColumnSpec, record::Record, value::Value};
use itertools::Itertools;

/// Result of an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// An `on_export` hook took over.
    Delegated,
    Csv(String),
}

pub fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Text(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

/// Header line of visible headers, then one line per record.
pub fn to_csv<'a>(columns: &[&ColumnSpec], rows: impl IntoIterator<Item = &'a Record>) -> String {
    let header = columns.iter().map(|c| c.header.as_str()).join(",");
    let body = rows
        .into_iter()
        .map(|record| columns.iter().map(|c| csv_cell(c.raw(record))).join(","));
    std::iter::once(header).chain(body).join("\n")
}
