//! Search providers: the external JSON API and the offline stub used when no key is set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{SearchError, SearchResult};

/// Source tag for results produced by the external API.
pub const GOOGLE_SOURCE: &str = "google";
pub const YANDEX_SOURCE: &str = "yandex";

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Up to `num_results` results, in the provider's order.
    async fn search(&self, query: &str, num_results: usize)
        -> Result<Vec<SearchResult>, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// External search API: `POST {query, result_count}` → `{organic: [{title, link, snippet}]}`.
pub struct ApiSearchProvider {
    api_key: String,
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl ApiSearchProvider {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            timeout,
            client,
        })
    }

    fn classify(&self, e: reqwest::Error) -> SearchError {
        if e.is_timeout() {
            SearchError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if e.is_decode() {
            SearchError::InvalidResponse(e.to_string())
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    query: &'a str,
    result_count: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[async_trait]
impl SearchProvider for ApiSearchProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&ApiRequest {
                query,
                result_count: num_results,
            })
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: ApiResponse = response.json().await.map_err(|e| self.classify(e))?;
        debug!(count = data.organic.len(), "search api answered");

        Ok(data
            .organic
            .into_iter()
            .take(num_results)
            .map(|r| SearchResult {
                title: r.title.unwrap_or_default(),
                url: r.link.unwrap_or_default(),
                description: r.snippet.unwrap_or_default(),
                source: GOOGLE_SOURCE.to_string(),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

/// Direct search-engine links, one per known engine. Never fails.
pub struct StubSearchProvider;

#[async_trait]
impl SearchProvider for StubSearchProvider {
    async fn search(
        &self,
        query: &str,
        _num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let escaped = urlencoding::encode(query);
        Ok(vec![
            SearchResult {
                title: format!("{query} - Yandex"),
                url: format!("https://yandex.ru/search/?text={escaped}"),
                description: "Результаты поиска из Яндекса".to_string(),
                source: YANDEX_SOURCE.to_string(),
            },
            SearchResult {
                title: format!("{query} - Google"),
                url: format!("https://google.com/search?q={escaped}"),
                description: "Результаты поиска из Google".to_string(),
                source: GOOGLE_SOURCE.to_string(),
            },
        ])
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
