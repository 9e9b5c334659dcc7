use axum::response::{IntoResponse, Json};

/// GET /v1/health: lightweight liveness check.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
