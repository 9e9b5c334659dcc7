use axum::extract::State;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

/// GET /v1/pages: list connected page contexts.
pub async fn list_pages(State(state): State<AppState>) -> impl IntoResponse {
    let pages = state.pages.list();
    Json(serde_json::json!({
        "pages": pages,
        "count": pages.len(),
        "pending_requests": state.page_router.pending_count(),
    }))
}
