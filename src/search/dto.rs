use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    contract::{required, RawUserId},
    error::ApiError,
    history::repo_types::Visit,
};

use super::types::SearchResult;

/// Body of `POST /search`.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearchRequest {
    pub query: Option<String>,
    /// Accepted for compatibility; the search route never writes history.
    #[allow(dead_code)]
    pub user_id: Option<RawUserId>,
}

pub struct SearchCommand {
    pub query: String,
}

impl TryFrom<RawSearchRequest> for SearchCommand {
    type Error = ApiError;

    fn try_from(raw: RawSearchRequest) -> Result<Self, Self::Error> {
        required(raw.query)
            .map(|query| Self { query })
            .ok_or_else(|| ApiError::validation("Query is required"))
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Query string of `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub search_query: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<Visit> for HistoryEntry {
    fn from(v: Visit) -> Self {
        Self {
            url: v.url,
            title: v.title,
            search_query: v.search_query,
            timestamp: v.visited_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}
