//! Retrieval client for the remote log store.
//!
//! The analysis engine operates purely on in-memory batches; this module
//! is the collaborator that produces them. It authenticates to the store's
//! management API, runs job-based searches, and returns event batches.

pub mod search;
pub mod types;

// Re-export main types
pub use search::SearchClient;
pub use types::{Credentials, SearchRequest};
