//! Text rendering of summaries and transaction groups.
//!
//! Pure formatting over the aggregation data model: no state, no I/O.

use crate::aggregator::count::BatchSummary;
use crate::aggregator::group::TransactionGroup;
use crate::parser::event::display_value;
use crate::parser::pii::detect_pii;

/// Render a batch summary as text.
///
/// **Public** - used by the `summary` export format
pub fn render_batch_summary(summary: &BatchSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Total events: {}", summary.total_events));

    if let Some(range) = &summary.time_range {
        lines.push(format!("Time range:   {} to {}", range.earliest, range.latest));
    }
    if summary.unparsed_timestamps > 0 {
        lines.push(format!(
            "              ({} events had unparseable timestamps)",
            summary.unparsed_timestamps
        ));
    }

    lines.push(format!("Fields ({}):", summary.fields.len()));
    for field in &summary.fields {
        lines.push(format!("  - {}", field));
    }

    lines.join("\n")
}

/// Render a per-field value histogram as text.
///
/// **Public** - used by the `summary` export format with `--aggregate-by`
pub fn render_histogram(field: &str, counts: &[(String, u64)]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Counts by '{}':", field));
    let width = counts.iter().map(|(value, _)| value.len()).max().unwrap_or(0);
    for (value, count) in counts {
        lines.push(format!("  {:<width$}  {}", value, count, width = width));
    }

    lines.join("\n")
}

/// Render one transaction group: member logs, then the field summary.
///
/// **Public** - the analyst-facing view of a transaction
///
/// Multi-valued paths are marked with their unique-value count; values
/// resembling personal data are annotated with the detected category.
pub fn render_transaction_group(group: &TransactionGroup) -> String {
    let mut lines = Vec::new();

    lines.push("=".repeat(70));
    lines.push(format!(
        "Transaction: {} ({} logs)",
        group.key,
        group.members.len()
    ));
    lines.push("=".repeat(70));

    for (position, member) in group.members.iter().enumerate() {
        lines.push(format!("--- Log {} ---", position + 1));
        for (field, value) in member {
            lines.push(format!("  {}: {}", field, display_value(value)));
        }
    }

    lines.push(String::new());
    lines.push(format!("Field summary ({} paths):", group.summary.len()));
    for (path, summary) in group.summary.iter() {
        if summary.is_multi_valued() {
            lines.push(format!(
                "  {} [{} unique values]:",
                path,
                summary.distinct_count()
            ));
            for value in &summary.values {
                lines.push(format!("    - {}{}", value, pii_note(value)));
            }
        } else {
            let value = &summary.values[0];
            lines.push(format!("  {}: {}{}", path, value, pii_note(value)));
        }
    }

    let shared = group.shared_values();
    if !shared.is_empty() && group.members.len() > 1 {
        lines.push(String::new());
        lines.push(format!("Shared across all {} logs:", group.members.len()));
        for (path, value) in shared {
            lines.push(format!("  {}: {}", path, value));
        }
    }

    lines.join("\n")
}

/// Annotation appended to values that look like personal data
///
/// **Private** - internal helper for group rendering
fn pii_note(value: &str) -> String {
    match detect_pii(value) {
        Some(kind) => format!("  [pii: {}]", kind.label()),
        None => String::new(),
    }
}
