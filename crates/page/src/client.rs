//! WebSocket page client: connects a [`Page`] to the gateway, performs the
//! handshake, forwards operator triggers and answers page requests.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use yk_protocol::PageMessage;

use crate::page::Page;

pub type SharedPage = Arc<Mutex<Page>>;

const WELCOME_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum PageClientError {
    #[error("websocket: {0}")]
    WebSocket(String),
    #[error("handshake: {0}")]
    Handshake(String),
    #[error("session closed")]
    Closed,
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for PageClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        PageClientError::WebSocket(e.to_string())
    }
}

/// Final state of one operation as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub operation_id: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Connection settings for a page context.
#[derive(Debug, Clone)]
pub struct PageClient {
    gateway_ws_url: String,
    page_id: String,
    url: Option<String>,
    version: String,
    heartbeat_interval: Duration,
}

impl PageClient {
    pub fn new(gateway_ws_url: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            gateway_ws_url: gateway_ws_url.into(),
            page_id: page_id.into(),
            url: None,
            version: env!("CARGO_PKG_VERSION").into(),
            heartbeat_interval: Duration::from_secs(30),
        }
    }

    /// Address of the host page, reported in `page_hello`.
    pub fn page_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Connect, send `page_hello`, wait for `gateway_welcome` and adopt the
    /// announced layout, then start the message loop in the background.
    pub async fn connect(self, page: SharedPage) -> Result<PageSession, PageClientError> {
        tracing::info!(url = %self.gateway_ws_url, page_id = %self.page_id, "connecting to gateway");

        let (ws, _response) = tokio_tungstenite::connect_async(&self.gateway_ws_url).await?;
        let (mut sink, mut stream) = ws.split();

        // ── Send page_hello ──────────────────────────────────────────
        let hello = PageMessage::PageHello {
            page_id: self.page_id.clone(),
            url: self.url.clone(),
            version: self.version.clone(),
        };
        let json = serde_json::to_string(&hello).map_err(anyhow::Error::from)?;
        sink.send(Message::Text(json)).await?;

        // ── Wait for gateway_welcome ─────────────────────────────────
        let welcome = tokio::time::timeout(WELCOME_TIMEOUT, async {
            while let Some(Ok(msg)) = stream.next().await {
                if let Message::Text(text) = msg {
                    if let Ok(PageMessage::GatewayWelcome {
                        session_id,
                        gateway_version,
                        layout,
                    }) = serde_json::from_str(&text)
                    {
                        return Ok((session_id, gateway_version, layout));
                    }
                }
            }
            Err(PageClientError::Handshake("connection closed before welcome".into()))
        })
        .await
        .map_err(|_| PageClientError::Handshake("gateway_welcome timeout".into()))??;

        let (session_id, gateway_version, layout) = welcome;
        tracing::info!(
            session_id = %session_id,
            gateway_version = %gateway_version,
            page_id = %self.page_id,
            "gateway welcomed page"
        );
        page.lock().set_layout(layout);

        // ── Message loop with heartbeat ──────────────────────────────
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<PageMessage>(64);
        let (outcome_tx, outcome_rx) = mpsc::channel::<OperationOutcome>(16);

        let ping_tx = outbound_tx.clone();
        let ping_interval = self.heartbeat_interval;
        let ping_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(ping_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                let msg = PageMessage::Ping {
                    timestamp: Utc::now().timestamp_millis(),
                };
                if ping_tx.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let writer_task = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(j) => j,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to serialize outbound message");
                        continue;
                    }
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        });

        let reader_page = page.clone();
        let reply_tx = outbound_tx.clone();
        let reader_task = tokio::spawn(async move {
            while let Some(Ok(msg)) = stream.next().await {
                match msg {
                    Message::Text(ref text) => match serde_json::from_str::<PageMessage>(text) {
                        Ok(PageMessage::PageRequest {
                            request_id,
                            operation_id,
                            action,
                        }) => {
                            let reply = reader_page.lock().handle(&operation_id, &action);
                            let resp = PageMessage::PageResponse { request_id, reply };
                            if reply_tx.send(resp).await.is_err() {
                                break;
                            }
                        }
                        Ok(PageMessage::OperationDone {
                            operation_id,
                            success,
                            error,
                        }) => {
                            reader_page.lock().end_operation(&operation_id);
                            let _ = outcome_tx
                                .send(OperationOutcome {
                                    operation_id,
                                    success,
                                    error,
                                })
                                .await;
                        }
                        Ok(PageMessage::Ping { timestamp }) => {
                            let _ = reply_tx.send(PageMessage::Pong { timestamp }).await;
                        }
                        Ok(PageMessage::Pong { .. }) => {
                            tracing::trace!("received pong");
                        }
                        Ok(other) => {
                            tracing::debug!(message = ?other, "ignoring message");
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "failed to parse message");
                        }
                    },
                    Message::Close(_) => {
                        tracing::info!("gateway closed connection");
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(PageSession {
            session_id,
            page,
            outbound: outbound_tx,
            outcomes: outcome_rx,
            tasks: vec![ping_task, writer_task, reader_task],
        })
    }
}

/// A live connection between one page and the gateway.
pub struct PageSession {
    session_id: String,
    page: SharedPage,
    outbound: mpsc::Sender<PageMessage>,
    outcomes: mpsc::Receiver<OperationOutcome>,
    tasks: Vec<JoinHandle<()>>,
}

impl PageSession {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    /// Operator invoked the action: pin the current target and notify the
    /// gateway. Returns the new operation id.
    pub async fn trigger(&self) -> Result<String, PageClientError> {
        let operation_id = self.page.lock().begin_operation();
        self.outbound
            .send(PageMessage::Trigger {
                operation_id: operation_id.clone(),
            })
            .await
            .map_err(|_| PageClientError::Closed)?;
        Ok(operation_id)
    }

    /// Wait for the next finished operation.
    pub async fn next_outcome(&mut self) -> Option<OperationOutcome> {
        self.outcomes.recv().await
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
