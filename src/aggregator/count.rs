//! Counting aggregation and batch summaries.

use chrono::DateTime;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

use crate::parser::event::{display_value, Event};
use crate::parser::{access::get_field, timestamp::parse_timestamp};
use crate::utils::config::MISSING_BUCKET;
use crate::utils::error::TimestampError;

/// Count events by the value of one field.
///
/// **Public** - main entry point for counting aggregation
///
/// Returns (value, count) pairs in first-seen order of the distinct
/// values, independent of batch size. Events missing the field are counted
/// under the `"(missing)"` bucket rather than dropped.
pub fn count_by(events: &[Event], field: &str) -> Vec<(String, u64)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for event in events {
        let key = match get_field(event, field) {
            Some(value) => display_value(value),
            None => MISSING_BUCKET.to_string(),
        };
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    debug!(
        "Aggregated {} events into {} distinct values of '{}'",
        events.len(),
        order.len(),
        field
    );

    order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect()
}

/// Observed time span of a batch
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimeRange {
    /// Earliest parsed timestamp, RFC 3339
    pub earliest: String,

    /// Latest parsed timestamp, RFC 3339
    pub latest: String,
}

/// Summary statistics for a batch of events
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Number of events in the batch
    pub total_events: usize,

    /// Sorted union of top-level field names
    pub fields: Vec<String>,

    /// Time span covered by parseable timestamps, if any
    pub time_range: Option<TimeRange>,

    /// Events whose timestamp field was present but unparseable
    pub unparsed_timestamps: usize,
}

/// Summarize a batch: size, field union, and time span.
///
/// **Public** - unparseable timestamps never abort the summary; they are
/// counted and reported so callers can surface data quality
pub fn summarize_events(events: &[Event], time_field: &str) -> BatchSummary {
    let mut fields: Vec<String> = Vec::new();
    for event in events {
        for key in event.keys() {
            if !fields.contains(key) {
                fields.push(key.clone());
            }
        }
    }
    fields.sort_unstable();

    let mut timestamps: Vec<f64> = Vec::new();
    let mut unparsed = 0usize;
    for event in events {
        match parse_timestamp(event, time_field) {
            Ok(epoch) => timestamps.push(epoch),
            Err(TimestampError::MissingField(_)) => {}
            Err(TimestampError::Unrecognized(_)) => unparsed += 1,
        }
    }
    if unparsed > 0 {
        debug!(
            "{} of {} events carried an unparseable '{}' value",
            unparsed,
            events.len(),
            time_field
        );
    }

    let time_range = match (
        timestamps.iter().cloned().reduce(f64::min),
        timestamps.iter().cloned().reduce(f64::max),
    ) {
        (Some(earliest), Some(latest)) => Some(TimeRange {
            earliest: format_epoch(earliest),
            latest: format_epoch(latest),
        }),
        _ => None,
    };

    BatchSummary {
        total_events: events.len(),
        fields,
        time_range,
        unparsed_timestamps: unparsed,
    }
}

/// Render an epoch-seconds float as RFC 3339
///
/// **Private** - falls back to the raw number for out-of-range values
fn format_epoch(epoch: f64) -> String {
    let seconds = epoch.trunc() as i64;
    let nanos = (epoch.fract() * 1_000_000_000.0).round() as u32;
    match DateTime::from_timestamp(seconds, nanos) {
        Some(datetime) => datetime.to_rfc3339(),
        None => epoch.to_string(),
    }
}
