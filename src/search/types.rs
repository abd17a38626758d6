use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One normalized search hit. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
    /// Provider tag: "yandex" or "google"
    pub source: String,
}

/// Errors from an external provider call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Search API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Search request failed: {0}")]
    Transport(String),

    #[error("Invalid search API response: {0}")]
    InvalidResponse(String),
}
