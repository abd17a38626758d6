use axum::{body::Bytes, extract::State, Json};
use tracing::{info, instrument, warn};

use crate::{
    contract::parse_body,
    error::ApiError,
    history::{
        dto::{RawVisitRequest, VisitRecorded},
        repo_types::NewVisit,
    },
    state::AppState,
};

/// `POST /history`: append one visit. Every call inserts a new row.
#[instrument(skip(state, body))]
pub async fn record_visit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VisitRecorded>, ApiError> {
    let visit = NewVisit::try_from(parse_body::<RawVisitRequest>(&body)).map_err(|e| {
        warn!(error = %e, "invalid history request");
        e
    })?;

    state.history.append(&visit).await?;

    info!(user_id = visit.user_id, url = %visit.url, "visit recorded");
    Ok(Json(VisitRecorded { success: true }))
}
