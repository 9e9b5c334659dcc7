pub mod health;
pub mod pages;
pub mod providers;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the API router.
///
/// Everything binds to localhost by default; the page WebSocket carries its
/// own optional pre-shared token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/health", get(health::health))
        .route("/v1/providers", get(providers::readiness))
        .route("/v1/pages", get(pages::list_pages))
        .route("/v1/page/ws", get(crate::pages::ws::page_ws))
}

/// The complete application with HTTP tracing and state attached.
pub fn app(state: AppState) -> Router {
    router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
