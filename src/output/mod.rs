//! Output rendering for result batches and transaction groups.
//!
//! This module handles turning analysis results into user-facing output:
//! - JSON export (and file writing shared by all formats)
//! - CSV export (one row per event)
//! - Text summaries and transaction group rendering

pub mod csv;
pub mod json;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::utils::error::FormatError;

// Re-export main functions
pub use csv::events_to_csv;
pub use json::{events_to_json, write_output};
pub use text::{render_batch_summary, render_histogram, render_transaction_group};

/// Export format for a result batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Pretty-printed JSON array of events
    #[default]
    Json,
    /// One row per event, columns = union of top-level fields
    Csv,
    /// Textual batch summary with optional per-field histogram
    Summary,
}

impl FromStr for ExportFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "csv" => Self::Csv,
            "summary" => Self::Summary,
            other => return Err(FormatError::UnknownExportFormat(other.to_string())),
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Summary => "summary",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("summary".parse::<ExportFormat>().unwrap(), ExportFormat::Summary);
        assert!(matches!(
            "yaml".parse::<ExportFormat>(),
            Err(FormatError::UnknownExportFormat(_))
        ));
    }
}
