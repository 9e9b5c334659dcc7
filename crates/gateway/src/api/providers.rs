use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use yk_domain::provider::ProviderId;

use crate::settings::{resolve_api_key, KeySource};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Selection {
    provider: String,
    model_alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'static str>,
    key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem: Option<String>,
}

/// GET /v1/providers: registered adapters and whether the current settings
/// would let an operation reach a provider. Keys are never returned.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let registered: Vec<ProviderId> = state.llm.list_providers();

    let settings = match state.settings.load().await {
        Ok(s) => s,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "registered": registered,
                    "error": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    let mut selection = Selection {
        provider: settings.provider.clone(),
        model_alias: settings.model.clone(),
        model: None,
        key_configured: false,
        key_source: None,
        problem: None,
    };

    match settings.provider.parse::<ProviderId>() {
        Ok(id) => {
            selection.model = state.llm.get(id).map(|p| p.resolve_model(&settings.model));
            match resolve_api_key(&settings, id) {
                Ok((_, source)) => {
                    selection.key_configured = true;
                    selection.key_source = Some(match source {
                        KeySource::Settings => "settings",
                        KeySource::Env => "env",
                    });
                }
                Err(e) => selection.problem = Some(e.to_string()),
            }
        }
        Err(e) => selection.problem = Some(e.to_string()),
    }

    let ready = selection.problem.is_none();
    Json(serde_json::json!({
        "ready": ready,
        "registered": registered,
        "selection": selection,
    }))
    .into_response()
}
