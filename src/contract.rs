//! Request/response rules shared by the auth, history and search routes.

use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, HeaderName, Method},
};
use serde::{de::DeserializeOwned, Deserialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::error::ApiError;

pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// How long browsers may cache a preflight answer.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86400);

/// CORS for a single route. Any `OPTIONS` request is answered here with 200 and an
/// empty body; every other response gets `Access-Control-Allow-Origin: *`.
pub fn cors_layer(methods: &[Method], allow_user_id: bool) -> CorsLayer {
    let mut headers = vec![header::CONTENT_TYPE];
    if allow_user_id {
        headers.push(X_USER_ID);
    }
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(methods.to_vec())
        .allow_headers(headers)
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Method-router fallback for anything a route does not handle.
pub async fn method_not_allowed(method: Method) -> ApiError {
    warn!(%method, "method not allowed");
    ApiError::MethodNotAllowed
}

/// Decodes a lenient body. Empty or malformed input yields `T::default()`, which the
/// caller's validation then rejects with its own "required" message.
pub fn parse_body<T>(body: &Bytes) -> T
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }
    match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "malformed json body");
            T::default()
        }
    }
}

/// `user_id` as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUserId {
    Number(i64),
    Text(String),
}

impl RawUserId {
    pub fn parse(&self) -> Option<i64> {
        match self {
            RawUserId::Number(n) => Some(*n),
            RawUserId::Text(s) => parse_user_id(s),
        }
        .filter(|id| *id > 0)
    }
}

pub fn parse_user_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Non-empty string field, or `None`.
pub fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}
