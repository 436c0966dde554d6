//! Search command implementation.
//!
//! The search command:
//! 1. Connects to the log store and runs the query
//! 2. Optionally decodes raw payload fields
//! 3. Applies the requested filter
//! 4. Groups by transaction or exports the batch
//! 5. Writes output to a file or stdout

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use crate::aggregator::{count_by, group_by_transaction, summarize_events};
use crate::client::{Credentials, SearchClient, SearchRequest};
use crate::output::{
    events_to_csv, events_to_json, render_batch_summary, render_histogram,
    render_transaction_group, write_output, ExportFormat,
};
use crate::parser::{filter_events, parse_raw_fields, FilterSpec, RawFormat};
use crate::utils::config::{RAW_FIELD, TIME_FIELD};

/// Arguments for the search command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SearchArgs {
    /// Store connection settings
    pub connection: ConnectionArgs,

    /// Search request (query, index, time range, result cap)
    pub request: SearchRequest,

    /// Skip all parsing and emit the store response as-is
    pub raw_passthrough: bool,

    /// Format of the raw payload field
    pub raw_format: RawFormat,

    /// Filter to apply after retrieval, if any
    pub filter: Option<FilterSpec>,

    /// Field to aggregate counts by in the summary output
    pub aggregate_by: Option<String>,

    /// Group events by this correlation field instead of exporting the batch
    pub transaction_field: Option<String>,

    /// Export format for ungrouped output
    pub output_format: ExportFormat,

    /// Output file (stdout when absent)
    pub output_file: Option<PathBuf>,
}

/// Connection settings shared by every store-touching command
#[derive(Debug, Clone)]
pub struct ConnectionArgs {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub verify_tls: bool,
}

impl ConnectionArgs {
    /// Resolve credentials, preferring the token
    ///
    /// **Public** - a missing credential set is a configuration error
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(token) = &self.token {
            return Ok(Credentials::Token(token.clone()));
        }
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            return Ok(Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            });
        }
        anyhow::bail!(
            "either a token or username/password must be provided \
             (flags or LOGSCAN_TOKEN / LOGSCAN_USERNAME / LOGSCAN_PASSWORD)"
        )
    }

    /// Build and probe a client for these settings
    pub fn connect(&self) -> Result<SearchClient> {
        let client = SearchClient::new(
            &self.host,
            self.port,
            self.credentials()?,
            self.verify_tls,
        )
        .context("Failed to create store client")?;

        info!("Connecting to {}:{}", self.host, self.port);
        if !client.test_connection() {
            anyhow::bail!("Failed to connect to the log store at {}:{}", self.host, self.port);
        }

        Ok(client)
    }
}

/// Validate search arguments before touching the network
///
/// **Public** - can be called before execute_search for early validation
pub fn validate_args(args: &SearchArgs) -> Result<()> {
    if args.connection.host.is_empty() {
        anyhow::bail!("Host cannot be empty");
    }

    if args.request.query.is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    if args.request.max_results == 0 {
        anyhow::bail!("max-results must be greater than 0");
    }

    // Credential shape is checked here too so misconfiguration fails fast
    args.connection.credentials()?;

    Ok(())
}

/// Execute the search command
///
/// **Public** - main entry point called from main.rs
pub fn execute_search(args: SearchArgs) -> Result<()> {
    let client = args.connection.connect()?;

    let mut events = client
        .search(&args.request)
        .context("Search against the log store failed")?;

    eprintln!("Found {} events", events.len());

    if args.raw_passthrough {
        let rendered = events_to_json(&events).context("Failed to render events as JSON")?;
        return emit(&rendered, args.output_file.as_deref());
    }

    let stats = parse_raw_fields(&mut events, RAW_FIELD, args.raw_format);
    debug!(
        "Raw decode stats: {} decoded, {} failed, {} without payload",
        stats.decoded, stats.failed, stats.missing
    );

    if let Some(filter) = &args.filter {
        info!("Filtering by {} {} {:?}", filter.field, filter.op, filter.value);
        events = filter_events(&events, filter);
        eprintln!("After filtering: {} events", events.len());
    }

    if let Some(transaction_field) = &args.transaction_field {
        info!("Grouping by transaction field: {}", transaction_field);
        let transactions = group_by_transaction(&events, transaction_field);
        eprintln!("Found {} unique transactions", transactions.len());

        let rendered: Vec<String> = transactions.iter().map(render_transaction_group).collect();
        return emit(&rendered.join("\n\n"), args.output_file.as_deref());
    }

    let rendered = match args.output_format {
        ExportFormat::Json => events_to_json(&events).context("Failed to render events as JSON")?,
        ExportFormat::Csv => events_to_csv(&events),
        ExportFormat::Summary => {
            let mut sections = vec![render_batch_summary(&summarize_events(&events, TIME_FIELD))];
            if let Some(field) = &args.aggregate_by {
                sections.push(render_histogram(field, &count_by(&events, field)));
            }
            sections.join("\n\n")
        }
    };

    emit(&rendered, args.output_file.as_deref())
}

/// Write rendered output to the requested destination
///
/// **Private** - internal helper for execute_search
fn emit(rendered: &str, output_file: Option<&std::path::Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            write_output(rendered, path).context("Failed to write output file")?;
            eprintln!("Results written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> ConnectionArgs {
        ConnectionArgs {
            host: "logs.example.com".to_string(),
            port: 8089,
            username: None,
            password: None,
            token: Some("secret".to_string()),
            verify_tls: true,
        }
    }

    fn args() -> SearchArgs {
        SearchArgs {
            connection: connection(),
            request: SearchRequest {
                query: "error".to_string(),
                ..Default::default()
            },
            raw_passthrough: false,
            raw_format: RawFormat::Json,
            filter: None,
            aggregate_by: None,
            transaction_field: None,
            output_format: ExportFormat::Json,
            output_file: None,
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&args()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_query() {
        let mut invalid = args();
        invalid.request.query = String::new();

        assert!(validate_args(&invalid).is_err());
    }

    #[test]
    fn test_validate_args_empty_host() {
        let mut invalid = args();
        invalid.connection.host = String::new();

        assert!(validate_args(&invalid).is_err());
    }

    #[test]
    fn test_validate_args_zero_max_results() {
        let mut invalid = args();
        invalid.request.max_results = 0;

        assert!(validate_args(&invalid).is_err());
    }

    #[test]
    fn test_credentials_require_token_or_pair() {
        let mut no_auth = connection();
        no_auth.token = None;
        assert!(no_auth.credentials().is_err());

        let mut basic = connection();
        basic.token = None;
        basic.username = Some("user".to_string());
        basic.password = Some("pass".to_string());
        assert!(matches!(
            basic.credentials().unwrap(),
            Credentials::Basic { .. }
        ));

        let mut half = connection();
        half.token = None;
        half.username = Some("user".to_string());
        assert!(half.credentials().is_err());
    }

    #[test]
    fn test_token_preferred_over_basic() {
        let mut both = connection();
        both.username = Some("user".to_string());
        both.password = Some("pass".to_string());

        assert!(matches!(both.credentials().unwrap(), Credentials::Token(_)));
    }
}
