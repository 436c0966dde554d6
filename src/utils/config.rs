//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for individual HTTP requests to the log store
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between search job status polls
pub const JOB_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum wall-clock time to wait for a search job to complete
pub const JOB_MAX_WAIT: Duration = Duration::from_secs(300);

/// Default management port for the log store REST API
pub const DEFAULT_MANAGEMENT_PORT: u16 = 8089;

/// Conventional field holding the raw event payload
pub const RAW_FIELD: &str = "_raw";

/// Conventional field holding the event timestamp
pub const TIME_FIELD: &str = "_time";

/// Default correlation field for transaction grouping
pub const DEFAULT_TRANSACTION_FIELD: &str = "serviceChainId";

/// Aggregation bucket for events missing the aggregated field
pub const MISSING_BUCKET: &str = "(missing)";

/// Group bucket for events missing the correlation field
pub const UNGROUPED_BUCKET: &str = "(ungrouped)";

// Numeric timestamps at or above this value are epoch milliseconds,
// below it epoch seconds
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

// Fallback timestamp formats, tried in priority order after RFC 3339 and
// numeric epoch interpretation. Year-less syslog timestamps (RFC 3164) are
// deliberately absent: without a year they cannot be normalized reliably.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%b/%Y:%H:%M:%S %z",
];
