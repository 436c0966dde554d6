//! Logscan
//!
//! Log search, parsing and transaction grouping for Splunk-compatible
//! log stores.
//!
//! This crate provides the core implementation for the `logscan` CLI tool:
//! a retrieval client for the store's job-based search API, a parsing
//! engine for semi-structured events (field access, pattern extraction,
//! timestamp normalization, filtering), transaction grouping with per-path
//! field summaries, and JSON/CSV/text export.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install logscan
//! logscan --help
//! ```

pub mod aggregator;
pub mod client;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
