//! HTTP client for the log store's management API.
//!
//! Synchronous by design: search is a create-poll-fetch sequence with no
//! concurrency to exploit. Failures surface as opaque [`ClientError`]s;
//! retry policy belongs to the caller.

use std::time::Instant;

use log::{debug, info, warn};
use reqwest::blocking::Client;

use super::types::{
    Credentials, IndexList, JobCreated, JobStatus, SearchRequest, SearchResults,
};
use crate::parser::event::Event;
use crate::utils::config::{DEFAULT_CLIENT_TIMEOUT, JOB_MAX_WAIT, JOB_POLL_INTERVAL};
use crate::utils::error::ClientError;

/// Client for the store's job-based search API
pub struct SearchClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl SearchClient {
    /// Create a new search client.
    ///
    /// # Errors
    /// * `ClientError::RequestFailed` - the underlying HTTP client could
    ///   not be constructed
    pub fn new(
        host: &str,
        port: u16,
        credentials: Credentials,
        verify_tls: bool,
    ) -> Result<Self, ClientError> {
        if !verify_tls {
            warn!("TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .timeout(DEFAULT_CLIENT_TIMEOUT)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(ClientError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: format!("https://{}:{}", host, port),
            credentials,
        })
    }

    /// Execute a search: create the job, wait for completion, fetch results
    ///
    /// **Public** - main entry point for retrieval
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<Event>, ClientError> {
        let query = build_query(&request.query, request.index.as_deref());
        info!("Executing search: {}", query);
        debug!(
            "Time range {} to {}, max {} results",
            request.earliest_time, request.latest_time, request.max_results
        );

        let created: JobCreated = self
            .authorize(self.client.post(format!("{}/services/search/jobs", self.base_url)))
            .form(&[
                ("search", query.as_str()),
                ("earliest_time", request.earliest_time.as_str()),
                ("latest_time", request.latest_time.as_str()),
                ("output_mode", "json"),
            ])
            .send()
            .map_err(ClientError::RequestFailed)?
            .error_for_status()
            .map_err(ClientError::RequestFailed)?
            .json()
            .map_err(ClientError::RequestFailed)?;

        debug!("Search job created: {}", created.sid);

        self.wait_for_job(&created.sid)?;
        self.fetch_results(&created.sid, request.max_results)
    }

    /// List index names known to the store, optionally filtered by substring
    pub fn list_indexes(&self, filter: Option<&str>) -> Result<Vec<String>, ClientError> {
        let response = self
            .authorize(self.client.get(format!("{}/services/data/indexes", self.base_url)))
            .query(&[("output_mode", "json"), ("count", "0")])
            .send()
            .map_err(ClientError::RequestFailed)?
            .error_for_status()
            .map_err(ClientError::RequestFailed)?;

        let listing: IndexList = response.json().map_err(ClientError::RequestFailed)?;
        let mut names: Vec<String> = listing.entry.into_iter().map(|e| e.name).collect();
        if let Some(term) = filter {
            let term = term.to_lowercase();
            names.retain(|name| name.to_lowercase().contains(&term));
        }
        Ok(names)
    }

    /// Probe the server info endpoint; false on any failure
    pub fn test_connection(&self) -> bool {
        let result = self
            .authorize(self.client.get(format!("{}/services/server/info", self.base_url)))
            .query(&[("output_mode", "json")])
            .send()
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => true,
            Err(e) => {
                warn!("Connection test failed: {}", e);
                false
            }
        }
    }

    /// Poll the job until it reaches a terminal dispatch state
    ///
    /// **Private** - internal helper for search
    fn wait_for_job(&self, sid: &str) -> Result<(), ClientError> {
        let job_url = format!("{}/services/search/jobs/{}", self.base_url, sid);
        let started = Instant::now();

        while started.elapsed() < JOB_MAX_WAIT {
            let status: JobStatus = self
                .authorize(self.client.get(&job_url))
                .query(&[("output_mode", "json")])
                .send()
                .map_err(ClientError::RequestFailed)?
                .error_for_status()
                .map_err(ClientError::RequestFailed)?
                .json()
                .map_err(ClientError::RequestFailed)?;

            match status.dispatch_state() {
                Some("DONE") => {
                    debug!("Search job {} done after {:.1}s", sid, started.elapsed().as_secs_f64());
                    return Ok(());
                }
                Some("FAILED") => {
                    return Err(ClientError::JobFailed(sid.to_string()));
                }
                state => {
                    debug!("Search job {} state: {}", sid, state.unwrap_or("unknown"));
                }
            }

            std::thread::sleep(JOB_POLL_INTERVAL);
        }

        Err(ClientError::JobTimeout)
    }

    /// Fetch the completed job's results
    ///
    /// **Private** - internal helper for search
    fn fetch_results(&self, sid: &str, max_results: usize) -> Result<Vec<Event>, ClientError> {
        let results_url = format!("{}/services/search/jobs/{}/results", self.base_url, sid);
        let count = max_results.to_string();

        let results: SearchResults = self
            .authorize(self.client.get(&results_url))
            .query(&[("output_mode", "json"), ("count", count.as_str())])
            .send()
            .map_err(ClientError::RequestFailed)?
            .error_for_status()
            .map_err(ClientError::RequestFailed)?
            .json()
            .map_err(ClientError::RequestFailed)?;

        info!("Fetched {} events for job {}", results.results.len(), sid);
        Ok(results.results)
    }

    /// Attach authentication to a request
    ///
    /// **Private** - internal helper
    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }
}

/// Normalize a user query into a full search string
///
/// **Private** - prepends the search command and index scope when the user
/// query does not carry them already
fn build_query(query: &str, index: Option<&str>) -> String {
    match index {
        Some(index) if !query.contains("index=") => {
            format!("search index={} {}", index, query)
        }
        _ if !query.to_lowercase().contains("search") => format!("search {}", query),
        _ => query.to_string(),
    }
}
