//! Decoding of raw payload fields into structured event fields.
//!
//! Store events conventionally carry the original log line in a `_raw`
//! field. Depending on the source it may be a JSON document, key=value
//! pairs, or free text. Decoding merges the recovered structure into the
//! event before analysis; a payload that fails to decode leaves its event
//! untouched (the string stays a single scalar leaf), so one malformed
//! event never aborts a batch.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::event::Event;
use crate::utils::error::FormatError;

/// Format of the raw payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// JSON document (the default for structured sources)
    #[default]
    Json,
    /// Free text; left untouched
    Plaintext,
    /// `key=value` pairs, values optionally double-quoted
    KeyValue,
}

impl FromStr for RawFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "plaintext" | "plain" | "text" => Self::Plaintext,
            "keyvalue" | "kv" => Self::KeyValue,
            other => return Err(FormatError::UnknownRawFormat(other.to_string())),
        })
    }
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Plaintext => "plaintext",
            Self::KeyValue => "keyvalue",
        })
    }
}

/// Per-batch decode statistics, reported for observability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawParseStats {
    /// Events whose payload decoded and merged
    pub decoded: usize,
    /// Events whose payload failed to decode (retained as-is)
    pub failed: usize,
    /// Events with no string payload at the raw field
    pub missing: usize,
}

/// Decode the raw payload field of every event in a batch.
///
/// **Public** - main entry point for raw decoding
///
/// A successfully decoded JSON object (or key=value set) merges into the
/// event at the top level; keys already present on the event win, since
/// store metadata is authoritative, and the raw field itself is removed so
/// its content is not double-counted by flattening. Non-object JSON,
/// decode failures and plaintext leave the event untouched.
pub fn parse_raw_fields(events: &mut [Event], field: &str, format: RawFormat) -> RawParseStats {
    let mut stats = RawParseStats::default();

    if format == RawFormat::Plaintext {
        debug!("Raw format is plaintext, leaving {} events untouched", events.len());
        return stats;
    }

    for event in events.iter_mut() {
        let Some(payload) = event.get(field).and_then(Value::as_str) else {
            stats.missing += 1;
            continue;
        };

        let decoded = match format {
            RawFormat::Json => decode_json(payload),
            RawFormat::KeyValue => decode_key_value(payload),
            RawFormat::Plaintext => unreachable!("handled above"),
        };

        match decoded {
            Some(fields) => {
                event.remove(field);
                for (key, value) in fields {
                    event.entry(key).or_insert(value);
                }
                stats.decoded += 1;
            }
            None => stats.failed += 1,
        }
    }

    if stats.failed > 0 {
        warn!(
            "Raw decode ({}): {} events failed to decode and were retained as-is",
            format, stats.failed
        );
    }
    debug!(
        "Raw decode ({}): {} decoded, {} failed, {} without payload",
        format, stats.decoded, stats.failed, stats.missing
    );

    stats
}

/// Decode a JSON object payload
///
/// **Private** - non-object documents are rejected: a bare array or scalar
/// has no field names to merge
fn decode_json(payload: &str) -> Option<Event> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => None,
    }
}

/// Decode `key=value` pairs, honoring double-quoted values
///
/// **Private** - returns None when no pair is found
fn decode_key_value(payload: &str) -> Option<Event> {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    let pair = PAIR.get_or_init(|| {
        Regex::new(r#"(\w+)=(?:"([^"]*)"|(\S+))"#).expect("key=value pattern is valid")
    });

    let mut fields = Event::new();
    for captures in pair.captures_iter(payload) {
        let key = captures[1].to_string();
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        fields.insert(key, Value::String(value.to_string()));
    }

    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}
