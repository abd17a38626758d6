use axum::{http::Method, routing::post, Router};

use crate::{
    contract::{cors_layer, method_not_allowed},
    state::AppState,
};

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/history",
            post(handlers::record_visit).fallback(method_not_allowed),
        )
        .layer(cors_layer(&[Method::POST, Method::OPTIONS], true))
}
