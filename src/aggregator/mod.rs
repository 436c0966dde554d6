//! Aggregation of event batches into counts, summaries and transactions.
//!
//! This module transforms filtered event batches into:
//! - Per-field value counts (first-seen order)
//! - Batch summaries (field union, time range)
//! - Transaction groups with per-path field summaries

pub mod count;
pub mod group;

// Re-export main types and functions
pub use count::{count_by, summarize_events, BatchSummary, TimeRange};
pub use group::{group_by_transaction, FieldSummary, PathSummary, TransactionGroup, Transactions};
