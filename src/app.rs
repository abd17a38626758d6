use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, history, search};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(history::router())
        .merge(search::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, HeaderMap, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, json)
    }

    fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
        headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or("")
    }

    async fn register(app: &Router, email: &str) -> i64 {
        let (status, _, body) = send(
            app,
            Method::POST,
            "/auth",
            Some(json!({"action": "register", "email": email, "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["user"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn preflight_answers_every_route_with_its_methods() {
        let app = build_app(AppState::fake());
        let cases = [
            ("/auth", vec!["POST", "OPTIONS"], false),
            ("/history", vec!["POST", "OPTIONS"], true),
            ("/search", vec!["GET", "POST", "OPTIONS"], true),
        ];
        for (uri, methods, user_id_header) in cases {
            // a body that would fail validation must not matter
            let (status, headers, body) =
                send(&app, Method::OPTIONS, uri, Some(json!({"junk": true}))).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, Value::Null, "{uri}");
            assert_eq!(header_str(&headers, "access-control-allow-origin"), "*");
            assert_eq!(header_str(&headers, "access-control-max-age"), "86400");

            let allowed = header_str(&headers, "access-control-allow-methods").to_uppercase();
            for m in &methods {
                assert!(allowed.contains(m), "{uri}: {allowed}");
            }
            if !methods.contains(&"GET") {
                assert!(!allowed.contains("GET"), "{uri}: {allowed}");
            }

            let allowed_headers =
                header_str(&headers, "access-control-allow-headers").to_lowercase();
            assert!(allowed_headers.contains("content-type"), "{uri}");
            assert_eq!(allowed_headers.contains("x-user-id"), user_id_header, "{uri}");
        }
    }

    #[tokio::test]
    async fn unhandled_methods_are_405_with_cors() {
        let app = build_app(AppState::fake());
        for (method, uri) in [
            (Method::GET, "/auth"),
            (Method::PUT, "/auth"),
            (Method::GET, "/history"),
            (Method::DELETE, "/history"),
            (Method::PATCH, "/search"),
            (Method::HEAD, "/search?user_id=1"),
        ] {
            let (status, headers, body) = send(&app, method.clone(), uri, None).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            if method != Method::HEAD {
                assert_eq!(body, json!({"error": "Method not allowed"}));
            }
            assert_eq!(header_str(&headers, "access-control-allow-origin"), "*");
            assert!(header_str(&headers, "content-type").starts_with("application/json"));
        }
    }

    #[tokio::test]
    async fn error_and_success_responses_carry_cors_and_json() {
        let app = build_app(AppState::fake());
        let (status, headers, _) =
            send(&app, Method::POST, "/search", Some(json!({"query": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(header_str(&headers, "access-control-allow-origin"), "*");
        assert!(header_str(&headers, "content-type").starts_with("application/json"));

        let (status, headers, _) =
            send(&app, Method::POST, "/search", Some(json!({"query": "x"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header_str(&headers, "access-control-allow-origin"), "*");
        assert!(header_str(&headers, "content-type").starts_with("application/json"));
    }

    #[tokio::test]
    async fn recorded_visit_shows_up_in_search_history() {
        let app = build_app(AppState::fake());
        let user_id = register(&app, "reader@example.com").await;

        for (url, title, query) in [
            ("https://a.example", "A", "first"),
            ("https://b.example", "B", ""),
        ] {
            let (status, _, body) = send(
                &app,
                Method::POST,
                "/history",
                Some(json!({"user_id": user_id, "url": url, "title": title, "search_query": query})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"success": true}));
        }

        let uri = format!("/search?user_id={user_id}");
        let (status, _, first) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let history = first["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["url"], "https://b.example");
        assert_eq!(history[0]["title"], "B");
        assert_eq!(history[0]["search_query"], "");
        assert_eq!(history[1]["url"], "https://a.example");
        assert_eq!(history[1]["search_query"], "first");
        assert!(history[0]["timestamp"].is_string());

        // reads without writes in between are stable
        let (_, _, second) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn history_is_capped_at_fifty_newest() {
        let app = build_app(AppState::fake());
        for i in 0..55 {
            let (status, _, _) = send(
                &app,
                Method::POST,
                "/history",
                Some(json!({"user_id": 1, "url": format!("https://p/{i}"), "title": format!("p{i}")})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, _, body) = send(&app, Method::GET, "/search?user_id=1", None).await;
        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 50);
        assert_eq!(history[0]["url"], "https://p/54");
        assert_eq!(history[49]["url"], "https://p/5");
    }

    #[tokio::test]
    async fn search_post_does_not_write_history() {
        let app = build_app(AppState::fake());
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/search",
            Some(json!({"query": "quiet", "user_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, _, body) = send(&app, Method::GET, "/search?user_id=1", None).await;
        assert_eq!(body, json!({"history": []}));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
