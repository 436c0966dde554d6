//! Types for the log store's REST search API.
//!
//! The store exposes a job-based search flow: create a search job, poll
//! its dispatch state, then fetch results. Responses use the store's
//! `entry`/`content` envelope.

use serde::Deserialize;

use crate::parser::event::Event;

/// Parameters for one search invocation
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Search query string
    pub query: String,

    /// Index to search (optional; may also be embedded in the query)
    pub index: Option<String>,

    /// Earliest time bound (relative like `-15m` or absolute)
    pub earliest_time: String,

    /// Latest time bound
    pub latest_time: String,

    /// Maximum number of results to fetch
    pub max_results: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            index: None,
            earliest_time: "-15m".to_string(),
            latest_time: "now".to_string(),
            max_results: 1000,
        }
    }
}

/// Authentication material for the store
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Bearer token
    Token(String),
    /// Username and password for basic auth
    Basic { username: String, password: String },
}

/// Response to search job creation
#[derive(Debug, Deserialize)]
pub struct JobCreated {
    /// Search job id
    pub sid: String,
}

/// Envelope around job status entries
#[derive(Debug, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub entry: Vec<JobEntry>,
}

impl JobStatus {
    /// Dispatch state of the first (only) job entry, if reported
    pub fn dispatch_state(&self) -> Option<&str> {
        self.entry
            .first()
            .and_then(|entry| entry.content.dispatch_state.as_deref())
    }
}

/// One job status entry
#[derive(Debug, Deserialize)]
pub struct JobEntry {
    pub content: JobContent,
}

/// Job status payload
#[derive(Debug, Deserialize)]
pub struct JobContent {
    #[serde(rename = "dispatchState")]
    pub dispatch_state: Option<String>,
}

/// Envelope around fetched search results
#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Event>,
}

/// Envelope around the index listing
#[derive(Debug, Deserialize)]
pub struct IndexList {
    #[serde(default)]
    pub entry: Vec<IndexEntry>,
}

/// One index entry
#[derive(Debug, Deserialize)]
pub struct IndexEntry {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_dispatch_state() {
        let status: JobStatus = serde_json::from_str(
            r#"{"entry": [{"content": {"dispatchState": "DONE"}}]}"#,
        )
        .unwrap();

        assert_eq!(status.dispatch_state(), Some("DONE"));
    }

    #[test]
    fn test_job_status_empty_entries() {
        let status: JobStatus = serde_json::from_str(r#"{"entry": []}"#).unwrap();

        assert_eq!(status.dispatch_state(), None);
    }

    #[test]
    fn test_search_results_default_empty() {
        let results: SearchResults = serde_json::from_str(r#"{}"#).unwrap();

        assert!(results.results.is_empty());
    }

    #[test]
    fn test_search_results_parse_events() {
        let results: SearchResults = serde_json::from_str(
            r#"{"results": [{"host": "a", "nested": {"k": 1}}, {"host": "b"}]}"#,
        )
        .unwrap();

        assert_eq!(results.results.len(), 2);
        assert_eq!(results.results[0]["host"], serde_json::json!("a"));
    }
}
