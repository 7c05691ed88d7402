//! Liveness endpoint, mounted at the root (outside `/api/v1`).

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Routes mounted at `/`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
