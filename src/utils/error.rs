//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Recoverable-per-item conditions (missing field, unparseable timestamp,
//! undecodable raw payload, type mismatch in a comparison) are NOT errors:
//! they are modeled as `Option`/skip-and-count so a single malformed event
//! never aborts a batch. The types below cover configuration errors and
//! collaborator failures, which are raised to the caller.

use thiserror::Error;

/// Errors that can occur while talking to the log store
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("either a token or username/password must be provided")]
    MissingCredentials,

    #[error("invalid search response: {0}")]
    InvalidResponse(String),

    #[error("search job failed: {0}")]
    JobFailed(String),

    #[error("search job did not complete within the wait limit")]
    JobTimeout,
}

/// Errors raised by the extraction pattern registry
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("pattern '{0}' not found")]
    NotFound(String),

    #[error("invalid regex for pattern '{name}': {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors that can occur during timestamp parsing
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("timestamp field '{0}' not present")]
    MissingField(String),

    #[error("unrecognized timestamp value: {0:?}")]
    Unrecognized(String),
}

/// Errors raised when building a filter specification
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("unknown filter operator: {0:?}")]
    InvalidOperator(String),

    #[error("invalid filter regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Errors raised when resolving a named format from the CLI
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unknown raw payload format: {0:?}")]
    UnknownRawFormat(String),

    #[error("unknown export format: {0:?}")]
    UnknownExportFormat(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
