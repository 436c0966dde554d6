//! Logscan CLI
//!
//! Searches a remote log store, parses the returned events, and derives
//! analyst-facing views: filtering, aggregation, transaction grouping,
//! and JSON/CSV/text export.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use logscan::client::SearchRequest;
use logscan::commands::{
    display_version, execute_list_indexes, execute_search, validate_args, ConnectionArgs,
    SearchArgs,
};
use logscan::output::ExportFormat;
use logscan::parser::{FilterSpec, RawFormat};
use logscan::utils::config::{DEFAULT_MANAGEMENT_PORT, DEFAULT_TRANSACTION_FIELD};

/// Logscan - log search, parsing and transaction grouping
#[derive(Parser, Debug)]
#[command(name = "logscan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Store connection options shared by store-touching commands
#[derive(Args, Debug)]
struct ConnectionOpts {
    /// Log store hostname or IP address
    #[arg(long, env = "LOGSCAN_HOST")]
    host: String,

    /// Management port of the store REST API
    #[arg(long, default_value_t = DEFAULT_MANAGEMENT_PORT)]
    port: u16,

    /// Username for basic authentication
    #[arg(long, env = "LOGSCAN_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "LOGSCAN_PASSWORD")]
    password: Option<String>,

    /// Bearer token (alternative to username/password)
    #[arg(long, env = "LOGSCAN_TOKEN")]
    token: Option<String>,

    /// Disable TLS certificate verification (not recommended for production)
    #[arg(long)]
    no_verify_tls: bool,
}

impl From<ConnectionOpts> for ConnectionArgs {
    fn from(opts: ConnectionOpts) -> Self {
        Self {
            host: opts.host,
            port: opts.port,
            username: opts.username,
            password: opts.password,
            token: opts.token,
            verify_tls: !opts.no_verify_tls,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the store and process the results
    Search {
        #[command(flatten)]
        connection: ConnectionOpts,

        /// Search query
        #[arg(short, long)]
        query: String,

        /// Index to search
        #[arg(short, long)]
        index: Option<String>,

        /// Earliest time for the search (relative like -15m, or absolute)
        #[arg(long, default_value = "-15m")]
        earliest: String,

        /// Latest time for the search
        #[arg(long, default_value = "now")]
        latest: String,

        /// Maximum number of results to return
        #[arg(long, default_value = "1000")]
        max_results: usize,

        /// Emit the store response as-is, skipping all parsing
        #[arg(long)]
        raw: bool,

        /// Format of the raw payload field (json, plaintext, keyvalue)
        #[arg(long, default_value = "json")]
        raw_format: RawFormat,

        /// Field to filter results on
        #[arg(long)]
        filter_field: Option<String>,

        /// Value to filter by
        #[arg(long)]
        filter_value: Option<String>,

        /// Filter operator (equals, not_equals, contains, gt, lt, regex)
        #[arg(long, default_value = "equals")]
        filter_operator: String,

        /// Field to aggregate counts by in summary output
        #[arg(long)]
        aggregate_by: Option<String>,

        /// Group and display results by transaction
        #[arg(long)]
        group_by_transaction: bool,

        /// Correlation field for transaction grouping
        #[arg(long, default_value = DEFAULT_TRANSACTION_FIELD)]
        transaction_field: String,

        /// Output format (json, csv, summary)
        #[arg(short, long, default_value = "json")]
        output_format: ExportFormat,

        /// Output file path (stdout when omitted)
        #[arg(long)]
        output_file: Option<PathBuf>,
    },

    /// List available store indexes
    Indexes {
        #[command(flatten)]
        connection: ConnectionOpts,

        /// Only show indexes containing this substring
        #[arg(long)]
        filter: Option<String>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Search {
            connection,
            query,
            index,
            earliest,
            latest,
            max_results,
            raw,
            raw_format,
            filter_field,
            filter_value,
            filter_operator,
            aggregate_by,
            group_by_transaction,
            transaction_field,
            output_format,
            output_file,
        } => {
            // Build the filter only when both sides were given
            let filter = match (filter_field, filter_value) {
                (Some(field), Some(value)) => {
                    Some(FilterSpec::parse(field, &filter_operator, value)?)
                }
                _ => None,
            };

            let args = SearchArgs {
                connection: connection.into(),
                request: SearchRequest {
                    query,
                    index,
                    earliest_time: earliest,
                    latest_time: latest,
                    max_results,
                },
                raw_passthrough: raw,
                raw_format,
                filter,
                aggregate_by,
                transaction_field: group_by_transaction.then_some(transaction_field),
                output_format,
                output_file,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute search
            execute_search(args)?;
        }

        Commands::Indexes { connection, filter } => {
            execute_list_indexes(&connection.into(), filter.as_deref())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
