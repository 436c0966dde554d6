//! Event representation and value coercion.
//!
//! An event is one log record: a string-keyed mapping whose values may be
//! scalars, nested mappings, or sequences. We keep events as
//! `serde_json::Map` (insertion-ordered via the `preserve_order` feature)
//! because field order drives flattening and grouping order downstream.

use serde_json::Value;

/// One log event as returned by the store: an ordered field/value mapping.
///
/// Events are never mutated in place by the analysis engine; every derived
/// structure (flattened paths, filtered subsets, group summaries) is a new
/// value. The only exception is raw-payload decoding, which runs before
/// analysis and operates on an owned batch.
pub type Event = serde_json::Map<String, Value>;

/// Coerce a leaf value to its display form.
///
/// **Public** - the single coercion point used by filtering, aggregation
/// and grouping; distinctness of summary values is judged on this form.
///
/// Null becomes the empty string, booleans and numbers their literal form,
/// strings pass through unchanged. Nested values (which only reach this
/// function from field access, never from flattening) serialize to compact
/// JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        nested => nested.to_string(),
    }
}

/// Coerce a value to a float for ordering comparisons.
///
/// **Public** - used by the greater_than/less_than filter operators.
///
/// Numbers convert directly, strings are parsed after trimming; everything
/// else is not numeric-coercible.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
