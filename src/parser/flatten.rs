//! Flattening of nested events into a dotted-path namespace.
//!
//! Converts one event into an ordered list of (path, leaf value) pairs:
//! mapping keys join with `.`, sequence positions append `[index]`. The
//! result is what transaction grouping folds into per-group summaries.

use serde_json::Value;

use super::event::Event;

/// Flatten an event into (path, leaf value) pairs.
///
/// **Public** - main entry point for path flattening
///
/// Traversal is depth-first in field insertion order; sequence elements keep
/// their index order. Scalars and nulls emit exactly one pair; empty
/// mappings and sequences emit nothing. The walk uses an explicit work
/// stack so arbitrarily deep input cannot exhaust the call stack.
///
/// The same input always yields the same ordered output, and the input is
/// never mutated.
///
/// Keys containing literal `.`, `[` or `]` produce paths that are
/// indistinguishable from genuinely nested ones; no escaping is applied.
///
/// # Example
/// `{"a": {"b": 1}, "c": [10, 20]}` flattens to
/// `[("a.b", 1), ("c[0]", 10), ("c[1]", 20)]`.
pub fn flatten_event(event: &Event) -> Vec<(String, Value)> {
    let mut pairs = Vec::new();

    // Work stack of (path-prefix, value). Children are pushed in reverse so
    // popping preserves depth-first, left-to-right emission order.
    let mut stack: Vec<(String, &Value)> = Vec::with_capacity(event.len());
    for (key, value) in event.iter().rev() {
        stack.push((key.clone(), value));
    }

    while let Some((path, value)) = stack.pop() {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    stack.push((format!("{path}.{key}"), child));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push((format!("{path}[{index}]"), child));
                }
            }
            leaf => pairs.push((path, leaf.clone())),
        }
    }

    pairs
}
