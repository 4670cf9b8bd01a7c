//! JSON documents with two-space indentation.

use crate::database::result::{QueryResult, RowMap};
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Renders row maps as a JSON array. Keys within a row are sorted.
pub fn render_rows(rows: &[RowMap]) -> serde_json::Result<String> {
    render_json(rows)
}

/// Renders a tabular result as a JSON array of row maps.
pub fn render_result_rows(result: QueryResult) -> serde_json::Result<String> {
    render_rows(&result.into_row_maps())
}
