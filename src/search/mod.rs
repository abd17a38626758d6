use axum::{http::Method, routing::get, Router};

use crate::{
    contract::{cors_layer, method_not_allowed},
    state::AppState,
};

mod dto;
pub mod handlers;
pub mod provider;
pub mod services;
pub mod types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/search",
            get(handlers::history)
                .post(handlers::search)
                // axum would otherwise answer HEAD with the GET handler
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .layer(cors_layer(&[Method::GET, Method::POST, Method::OPTIONS], true))
}
