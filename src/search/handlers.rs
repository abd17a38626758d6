use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    contract::{parse_body, parse_user_id, X_USER_ID},
    error::ApiError,
    history::repo::HISTORY_LIMIT,
    state::AppState,
};

use super::{
    dto::{
        HistoryParams, HistoryResponse, RawSearchRequest, SearchCommand, SearchResponse,
    },
    services::aggregate,
};

/// `POST /search`: aggregate provider results for a query. Provider failures still
/// answer 200, with a sentinel result in place of the list.
#[instrument(skip(state, body))]
pub async fn search(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let cmd = SearchCommand::try_from(parse_body::<RawSearchRequest>(&body)).map_err(|e| {
        warn!(error = %e, "invalid search request");
        e
    })?;

    let results = aggregate(
        state.search.as_ref(),
        &cmd.query,
        state.config.search.result_count,
    )
    .await;
    Ok(Json(SearchResponse { results }))
}

/// `GET /search?user_id=N`: newest visits of a user. Without a user id this answers
/// an empty list rather than 400, unlike `POST /history`.
#[instrument(skip(state, params, headers))]
pub async fn history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(params) = params.map_err(|e| {
        warn!(error = %e, "malformed query string");
        ApiError::validation("Invalid query string")
    })?;
    let raw = params
        .user_id
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            headers
                .get(X_USER_ID)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        });

    let Some(raw) = raw else {
        debug!("history requested without user_id");
        return Ok(Json(HistoryResponse { history: vec![] }));
    };

    let user_id = parse_user_id(&raw).ok_or_else(|| {
        warn!(user_id = %raw, "non-numeric user_id");
        ApiError::validation("user_id must be an integer")
    })?;

    let visits = state
        .history
        .recent_for_user(user_id, HISTORY_LIMIT)
        .await?;

    info!(user_id, count = visits.len(), "history fetched");
    Ok(Json(HistoryResponse {
        history: visits.into_iter().map(Into::into).collect(),
    }))
}
