//! Rendering of generated `Path | Description` tables.

use crate::models::IndexRow;

const HEADER: &str = "| Path | Description |";
const SEPARATOR: &str = "| ---- | ----------- |";

/// Render rows in the order given. Paths are wrapped in backticks; the
/// description must already be escaped for a table cell.
pub fn render(rows: &[IndexRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(HEADER.to_string());
    lines.push(SEPARATOR.to_string());
    for row in rows {
        lines.push(format!("| `{}` | {} |", row.path, row.description));
    }
    lines.join("\n")
}
