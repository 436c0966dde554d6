//! Single-field access with dot notation.
//!
//! Resolves one dotted path against an event without full flattening.
//! Used by filtering, extraction and grouping key lookup; absence is a
//! first-class result (`None`), distinct from a present null.

use serde_json::Value;

use super::event::{display_value, Event};

/// Resolve a dotted path against an event.
///
/// **Public** - main entry point for field access
///
/// Splits the path on `.`; each segment resolves a mapping key, and may
/// carry `[N]` suffixes to index into sequences (`tags[0]`,
/// `hops[1].host`). A bare integer segment also indexes a sequence
/// (`hops.0.host` is equivalent). Any miss - unknown key, index out of
/// bounds, scalar in the middle of the path - yields `None`; this never
/// panics or errors.
///
/// Unlike [`flatten_event`](super::flatten::flatten_event) this reports
/// sub-fields of an array of objects only when the path names each index
/// explicitly.
pub fn get_field<'a>(event: &'a Event, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current: Option<&'a Value> = None;
    for segment in path.split('.') {
        let (key, indexes) = parse_segment(segment)?;
        let mut value = match current {
            // First segment resolves against the event itself
            None => event.get(key)?,
            Some(value) => step(value, key)?,
        };
        for index in indexes {
            value = value.as_array()?.get(index)?;
        }
        current = Some(value);
    }
    current
}

/// Resolve a dotted path and coerce the result to its display form.
///
/// **Public** - convenience for callers comparing or printing field values
pub fn get_field_str(event: &Event, path: &str) -> Option<String> {
    get_field(event, path).map(display_value)
}

/// Resolve one path segment against an intermediate value
///
/// **Private** - internal helper for get_field
fn step<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Split a segment into its key and trailing `[N]` indexes
///
/// **Private** - "tags[0][1]" becomes ("tags", [0, 1]); malformed bracket
/// syntax yields None
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };

    let key = &segment[..open];
    let mut indexes = Vec::new();
    let mut rest = &segment[open..];
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return None;
        }
        let close = rest.find(']')?;
        indexes.push(rest[1..close].parse::<usize>().ok()?);
        rest = &rest[close + 1..];
    }
    Some((key, indexes))
}
