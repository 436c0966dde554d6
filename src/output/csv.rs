//! CSV export of event batches.
//!
//! One row per event; columns are the sorted union of top-level field
//! names across the batch. Nested values serialize to compact JSON inside
//! their cell.

use crate::parser::event::{display_value, Event};

/// Render a batch of events as CSV.
///
/// **Public** - main entry point for CSV export
///
/// An empty batch renders as an empty string (no header row, matching the
/// "nothing to export" case). Cells for fields an event does not carry are
/// empty.
pub fn events_to_csv(events: &[Event]) -> String {
    if events.is_empty() {
        return String::new();
    }

    let mut columns: Vec<String> = Vec::new();
    for event in events {
        for key in event.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns.sort_unstable();

    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| escape_field(c))
            .collect::<Vec<_>>()
            .join(","),
    );

    for event in events {
        let row: Vec<String> = columns
            .iter()
            .map(|column| match event.get(column) {
                Some(value) => escape_field(&display_value(value)),
                None => String::new(),
            })
            .collect();
        lines.push(row.join(","));
    }

    let mut rendered = lines.join("\r\n");
    rendered.push_str("\r\n");
    rendered
}

/// Quote a field when it contains a delimiter, quote or line break
///
/// **Private** - embedded quotes double per RFC 4180
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
