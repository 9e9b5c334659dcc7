//! Round-trip dispatch tests against an in-process mock of all three
//! provider APIs bound to `127.0.0.1:0`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use yk_domain::config::ProvidersConfig;
use yk_domain::error::Error;
use yk_domain::provider::ApiKey;
use yk_providers::ProviderRegistry;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Mock server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone)]
enum Reply {
    Ok,
    Status(u16, &'static str),
    Blank,
    Slow(Duration),
}

#[derive(Default)]
struct Seen {
    path: Option<String>,
    query_key: Option<String>,
    authorization: Option<String>,
    x_api_key: Option<String>,
    anthropic_version: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct Mock {
    reply: Reply,
    seen: Arc<Mutex<Seen>>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

impl Mock {
    fn record(&self, path: String, headers: &HeaderMap, body: Value) {
        let mut seen = self.seen.lock();
        seen.path = Some(path);
        seen.authorization = header(headers, "authorization");
        seen.x_api_key = header(headers, "x-api-key");
        seen.anthropic_version = header(headers, "anthropic-version");
        seen.body = Some(body);
    }

    async fn respond(&self, success: Value, blank: Value) -> Response {
        match &self.reply {
            Reply::Ok => Json(success).into_response(),
            Reply::Blank => Json(blank).into_response(),
            Reply::Status(code, body) => {
                (StatusCode::from_u16(*code).unwrap(), body.to_string()).into_response()
            }
            Reply::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Json(success).into_response()
            }
        }
    }
}

async fn gemini(
    State(mock): State<Mock>,
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.record(format!("/v1beta/models/{call}"), &headers, body);
    mock.seen.lock().query_key = query.get("key").cloned();
    mock.respond(
        json!({"candidates": [{"content": {"parts": [{"text": "  S: gemini note\n"}]}}]}),
        json!({"candidates": []}),
    )
    .await
}

async fn openai(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("/v1/chat/completions".into(), &headers, body);
    mock.respond(
        json!({"choices": [{"message": {"role": "assistant", "content": "S: openai note"}}]}),
        json!({"choices": [{"message": {"role": "assistant", "content": "   "}}]}),
    )
    .await
}

async fn claude(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("/v1/messages".into(), &headers, body);
    mock.respond(
        json!({"content": [{"type": "text", "text": "S: claude note"}]}),
        json!({"content": []}),
    )
    .await
}

async fn spawn_mock(reply: Reply) -> (ProvidersConfig, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let app = Router::new()
        .route("/v1beta/models/:call", post(gemini))
        .route("/v1/chat/completions", post(openai))
        .route("/v1/messages", post(claude))
        .with_state(Mock {
            reply,
            seen: seen.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = format!("http://{addr}");
    let config = ProvidersConfig {
        gemini_base_url: base.clone(),
        openai_base_url: base.clone(),
        claude_base_url: base,
        request_timeout_secs: 1,
    };
    (config, seen)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Success paths
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn gemini_pro_alias_hits_pro_model_with_key_in_query() {
    let (config, seen) = spawn_mock(Reply::Ok).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    let note = registry
        .dispatch("gemini", "gemini-pro", &ApiKey::new("g-key"), "プロンプト")
        .await
        .unwrap();

    assert_eq!(note, "S: gemini note");
    let seen = seen.lock();
    assert_eq!(
        seen.path.as_deref(),
        Some("/v1beta/models/gemini-2.5-pro:generateContent")
    );
    assert_eq!(seen.query_key.as_deref(), Some("g-key"));
    let body = seen.body.as_ref().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "プロンプト");
}

#[tokio::test]
async fn openai_sends_bearer_and_mini_model_by_default() {
    let (config, seen) = spawn_mock(Reply::Ok).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    let note = registry
        .dispatch("openai", "gpt-4o-mini", &ApiKey::new("sk-1"), "p")
        .await
        .unwrap();

    assert_eq!(note, "S: openai note");
    let seen = seen.lock();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer sk-1"));
    assert_eq!(seen.body.as_ref().unwrap()["model"], "gpt-4o-mini");
}

#[tokio::test]
async fn claude_sends_key_and_version_headers() {
    let (config, seen) = spawn_mock(Reply::Ok).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    let note = registry
        .dispatch("claude", "claude-sonnet", &ApiKey::new("ant-1"), "p")
        .await
        .unwrap();

    assert_eq!(note, "S: claude note");
    let seen = seen.lock();
    assert_eq!(seen.x_api_key.as_deref(), Some("ant-1"));
    assert_eq!(seen.anthropic_version.as_deref(), Some("2023-06-01"));
    let body = seen.body.as_ref().unwrap();
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["max_tokens"], 4096);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Failure paths
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn non_success_status_carries_status_and_raw_body() {
    let (config, _) = spawn_mock(Reply::Status(429, "{\"error\":\"rate limited\"}")).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    for provider in ["gemini", "openai", "claude"] {
        let err = registry
            .dispatch(provider, "x", &ApiKey::new("k"), "p")
            .await
            .unwrap_err();
        match err {
            Error::ProviderHttp {
                provider: p,
                status,
                body,
            } => {
                assert_eq!(p, provider);
                assert_eq!(status, 429);
                assert_eq!(body, "{\"error\":\"rate limited\"}");
            }
            other => panic!("expected ProviderHttp, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn success_without_text_is_empty_response() {
    let (config, _) = spawn_mock(Reply::Blank).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    for provider in ["gemini", "openai", "claude"] {
        let err = registry
            .dispatch(provider, "x", &ApiKey::new("k"), "p")
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::EmptyResponse(ref p) if p == provider),
            "{provider}: {err:?}"
        );
    }
}

#[tokio::test]
async fn slow_provider_times_out() {
    let (config, _) = spawn_mock(Reply::Slow(Duration::from_secs(3))).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    let err = registry
        .dispatch("openai", "gpt-4o", &ApiKey::new("k"), "p")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "{err:?}");
}

#[tokio::test]
async fn unknown_provider_never_reaches_the_network() {
    let (config, seen) = spawn_mock(Reply::Ok).await;
    let registry = ProviderRegistry::from_config(&config).unwrap();

    let err = registry
        .dispatch("cohere", "x", &ApiKey::new("k"), "p")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownProvider(_)));
    assert!(seen.lock().path.is_none());
}
