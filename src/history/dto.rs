use serde::{Deserialize, Serialize};

use crate::{
    contract::{required, RawUserId},
    error::ApiError,
    history::repo_types::NewVisit,
};

/// Body of `POST /history` as sent by clients.
#[derive(Debug, Default, Deserialize)]
pub struct RawVisitRequest {
    pub user_id: Option<RawUserId>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub search_query: Option<String>,
}

impl TryFrom<RawVisitRequest> for NewVisit {
    type Error = ApiError;

    fn try_from(raw: RawVisitRequest) -> Result<Self, Self::Error> {
        let user_id = raw.user_id.as_ref().and_then(RawUserId::parse);
        match (user_id, required(raw.url), required(raw.title)) {
            (Some(user_id), Some(url), Some(title)) => Ok(NewVisit {
                user_id,
                url,
                title,
                search_query: raw.search_query.unwrap_or_default(),
            }),
            _ => Err(ApiError::validation("user_id, url, and title are required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VisitRecorded {
    pub success: bool,
}
