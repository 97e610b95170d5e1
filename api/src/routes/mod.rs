//! API route definitions

pub mod analyze;
pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::AppState;

mod defaults {
    pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
}

/// Success envelope: `{success: true, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Create all API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/analyze", post(analyze::analyze_text))
        .route("/analyze-image", post(analyze::analyze_image))
        .route("/chat", post(chat::handle_chat))
}

/// Full application router with state, body limit, security headers and 404 fallback
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .nest("/api", api_routes())
        .fallback(health::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(defaults::BODY_LIMIT_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::service::{mock::MockLlm, AiService};
    use crate::AppState;

    pub fn app_with(mock: &Arc<MockLlm>) -> Router {
        let state = Arc::new(AppState {
            ai: AiService::new(mock.clone()),
        });
        super::app(state)
    }

    pub fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
