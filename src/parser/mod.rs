//! Log event parsing and derivation.
//!
//! This module handles:
//! - The event data model and value coercion
//! - Path flattening of nested structures
//! - Single-field access with dot notation
//! - The named extraction pattern registry
//! - Timestamp normalization
//! - Filter evaluation
//! - Raw payload decoding and PII classification

pub mod access;
pub mod event;
pub mod filter;
pub mod flatten;
pub mod pattern;
pub mod pii;
pub mod raw;
pub mod timestamp;

// Re-export main types
pub use access::{get_field, get_field_str};
pub use event::{display_value, numeric_value, Event};
pub use filter::{filter_events, FilterOp, FilterSpec};
pub use flatten::flatten_event;
pub use pattern::{ExtractionPattern, LogParser};
pub use pii::{detect_pii, PiiKind};
pub use raw::{parse_raw_fields, RawFormat, RawParseStats};
pub use timestamp::parse_timestamp;
