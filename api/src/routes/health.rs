//! Root, health and fallback routes

use axum::{extract::OriginalUri, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::service::timestamp;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "TrustNet-AI API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
    }))
}

/// GET /api/health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "TrustNet-AI API is running",
        "timestamp": timestamp(),
    }))
}

/// Any unmatched route. `OriginalUri` keeps the `/api` prefix for nested misses.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
