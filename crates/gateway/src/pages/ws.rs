//! WebSocket endpoint for page contexts.
//!
//! Flow:
//! 1. Page connects to `/v1/page/ws?token=<pre-shared-token>`
//! 2. Page sends `page_hello`
//! 3. Gateway responds with `gateway_welcome` carrying the page layout
//! 4. Message loop: page sends `trigger`, gateway runs the pipeline and sends
//!    `page_request`s, page answers with `page_response`, gateway closes the
//!    operation with `operation_done`; both sides exchange `ping`/`pong`

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::mpsc;

use yk_protocol::PageMessage;

use crate::pages::registry::ConnectedPage;
use crate::state::AppState;

const HELLO_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Constant-time comparison against the startup-computed token digest.
fn token_matches(expected_hash: &[u8], provided: &str) -> bool {
    let provided_hash = Sha256::digest(provided.as_bytes());
    provided_hash.as_slice().ct_eq(expected_hash).into()
}

/// GET /v1/page/ws: upgrade to WebSocket.
pub async fn page_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    if let Some(expected) = &state.page_token_hash {
        let provided = query.token.as_deref().unwrap_or("");
        if !token_matches(expected, provided) {
            return (StatusCode::UNAUTHORIZED, "invalid or missing page token").into_response();
        }
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state))
        .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Socket handler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    let Some(hello) = wait_for_hello(&mut ws_stream).await else {
        tracing::warn!("page disconnected before sending page_hello");
        return;
    };

    let session_id = uuid::Uuid::new_v4().to_string();

    // Register before the welcome goes out: once the page sees it, it may
    // trigger immediately.
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<PageMessage>(64);
    state.pages.register(ConnectedPage {
        session_id: session_id.clone(),
        page_id: hello.page_id.clone(),
        url: hello.url,
        version: hello.version.clone(),
        connected_at: Utc::now(),
        last_seen: Utc::now(),
        operations_in_flight: 0,
        sink: outbound_tx,
    });

    let welcome = PageMessage::GatewayWelcome {
        session_id: session_id.clone(),
        gateway_version: env!("CARGO_PKG_VERSION").to_string(),
        layout: state.orchestrator.layout().clone(),
    };
    if send_ws_message(&mut ws_sink, &welcome).await.is_err() {
        tracing::warn!(page_id = %hello.page_id, "failed to send gateway_welcome");
        state.pages.remove(&session_id);
        return;
    }

    tracing::info!(
        page_id = %hello.page_id,
        session_id = %session_id,
        version = %hello.version,
        "page connected"
    );

    // Writer task: forwards outbound channel messages to the WS sink.
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if send_ws_message(&mut ws_sink, &msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_stream.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<PageMessage>(&text) {
                Ok(page_msg) => handle_inbound(&state, &session_id, page_msg).await,
                Err(_) => {
                    tracing::debug!(session_id = %session_id, "ignoring unparseable message");
                }
            },
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => state.pages.touch(&session_id),
            _ => {}
        }
    }

    let failed = state.page_router.fail_pending_for_session(&session_id);
    writer.abort();
    state.pages.remove(&session_id);
    tracing::info!(session_id = %session_id, failed_in_flight = failed, "page disconnected");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct HelloData {
    page_id: String,
    url: Option<String>,
    version: String,
}

async fn wait_for_hello(
    stream: &mut (impl StreamExt<Item = Result<Message, axum::Error>> + Unpin),
) -> Option<HelloData> {
    let hello = tokio::time::timeout(HELLO_TIMEOUT, async {
        while let Some(Ok(msg)) = stream.next().await {
            if let Message::Text(text) = msg {
                if let Ok(PageMessage::PageHello { page_id, url, version }) =
                    serde_json::from_str::<PageMessage>(&text)
                {
                    return Some(HelloData { page_id, url, version });
                }
            }
        }
        None
    })
    .await;

    hello.unwrap_or(None)
}

async fn send_ws_message(
    sink: &mut (impl SinkExt<Message> + Unpin),
    msg: &PageMessage,
) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json)).await.map_err(|_| ())
}

async fn handle_inbound(state: &AppState, session_id: &str, msg: PageMessage) {
    state.pages.touch(session_id);

    match msg {
        PageMessage::Trigger { operation_id } => {
            spawn_operation(state.clone(), session_id.to_string(), operation_id);
        }
        PageMessage::PageResponse { request_id, reply } => {
            state.page_router.complete_request(&request_id, reply);
        }
        PageMessage::Ping { timestamp } => {
            if let Some(sink) = state.pages.get_sink(session_id) {
                let _ = sink.send(PageMessage::Pong { timestamp }).await;
            }
        }
        PageMessage::Pong { .. } => {}
        other => {
            tracing::debug!(session_id = %session_id, message = ?other, "unexpected inbound message");
        }
    }
}

/// Run the pipeline for one trigger without blocking the reader loop, which
/// must stay free to deliver the page's responses.
fn spawn_operation(state: AppState, session_id: String, operation_id: String) {
    tokio::spawn(async move {
        tracing::info!(session_id = %session_id, operation_id = %operation_id, "operation triggered");
        state.pages.operation_started(&session_id);

        let bridge = state.page_router.bridge(session_id.clone());
        let summary = state.orchestrator.run(&bridge, &operation_id).await;

        state.pages.operation_finished(&session_id);

        let done = PageMessage::OperationDone {
            operation_id,
            success: summary.is_success(),
            error: summary.error_message(),
        };
        match state.pages.get_sink(&session_id) {
            Some(sink) => {
                let _ = sink.send(done).await;
            }
            None => {
                tracing::debug!(session_id = %session_id, "page gone before operation_done");
            }
        }
    });
}
