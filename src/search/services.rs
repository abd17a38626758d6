use tracing::{info, warn};

use super::{
    provider::{SearchProvider, GOOGLE_SOURCE},
    types::SearchResult,
};

/// Runs `provider` for `query` and keeps at most `limit` results.
///
/// Provider failures never propagate: the whole result list is replaced by a single
/// sentinel entry with an empty `url` and the error text in `description`, so callers
/// can tell degraded results apart from real ones.
pub async fn aggregate(
    provider: &dyn SearchProvider,
    query: &str,
    limit: usize,
) -> Vec<SearchResult> {
    match provider.search(query, limit).await {
        Ok(mut results) => {
            results.truncate(limit);
            info!(provider = provider.name(), count = results.len(), "search aggregated");
            results
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "search provider failed");
            vec![sentinel(e.to_string())]
        }
    }
}

pub fn sentinel(message: String) -> SearchResult {
    SearchResult {
        title: "Search failed".to_string(),
        url: String::new(),
        description: message,
        source: GOOGLE_SOURCE.to_string(),
    }
}
