//! Timestamp normalization to epoch seconds.
//!
//! Events carry timestamps in wildly different shapes: epoch numbers
//! (seconds or milliseconds), RFC 3339 strings, or one of several legacy
//! formats. Everything normalizes to an epoch-seconds float.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::access::get_field;
use super::event::display_value;
use super::event::Event;
use crate::utils::config::{EPOCH_MILLIS_THRESHOLD, TIMESTAMP_FORMATS};
use crate::utils::error::TimestampError;

/// Parse an event's timestamp field into epoch seconds.
///
/// **Public** - main entry point for timestamp parsing
///
/// Accepted shapes, in priority order:
/// 1. JSON numbers and pure-numeric strings, interpreted as epoch seconds;
///    values at or above 10^12 are taken as epoch milliseconds
/// 2. RFC 3339 / ISO-8601 with optional fractional seconds and `Z`/offset
/// 3. The fallback formats in [`TIMESTAMP_FORMATS`], tried in declared
///    order; formats without an offset are assumed UTC
///
/// # Errors
/// * `TimestampError::MissingField` - the field is absent
/// * `TimestampError::Unrecognized` - no shape matched
///
/// Both are recoverable-per-item: callers log and continue with the rest
/// of the batch.
pub fn parse_timestamp(event: &Event, field: &str) -> Result<f64, TimestampError> {
    let value = get_field(event, field)
        .ok_or_else(|| TimestampError::MissingField(field.to_string()))?;

    if let Value::Number(n) = value {
        if let Some(seconds) = n.as_f64() {
            return Ok(normalize_epoch(seconds));
        }
    }

    let text = display_value(value);
    let text = text.trim();
    if text.is_empty() {
        return Err(TimestampError::Unrecognized(text.to_string()));
    }

    if let Ok(seconds) = text.parse::<f64>() {
        return Ok(normalize_epoch(seconds));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(epoch_seconds(parsed.timestamp(), parsed.timestamp_subsec_micros()));
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Ok(epoch_seconds(parsed.timestamp(), parsed.timestamp_subsec_micros()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            let utc = naive.and_utc();
            return Ok(epoch_seconds(utc.timestamp(), utc.timestamp_subsec_micros()));
        }
    }

    Err(TimestampError::Unrecognized(text.to_string()))
}

/// Scale a raw epoch number down from milliseconds when it is too large
/// to be seconds
///
/// **Private** - internal helper for parse_timestamp
fn normalize_epoch(value: f64) -> f64 {
    if value.abs() >= EPOCH_MILLIS_THRESHOLD {
        value / 1_000.0
    } else {
        value
    }
}

/// Combine whole seconds and sub-second microseconds into a float
///
/// **Private** - internal helper for parse_timestamp
fn epoch_seconds(seconds: i64, subsec_micros: u32) -> f64 {
    seconds as f64 + f64::from(subsec_micros) / 1_000_000.0
}
