//! In-memory registry of connected page contexts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::mpsc;

use yk_protocol::PageMessage;

/// Channel feeding a connected page's WebSocket writer task.
pub type PageSink = mpsc::Sender<PageMessage>;

/// A connected page. Keyed by `session_id`: the same `page_id` may be open
/// in several tabs at once.
pub struct ConnectedPage {
    pub session_id: String,
    pub page_id: String,
    pub url: Option<String>,
    pub version: String,
    pub connected_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub operations_in_flight: usize,
    pub sink: PageSink,
}

/// Summary returned by `GET /v1/pages`.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub session_id: String,
    pub page_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub version: String,
    pub connected_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub operations_in_flight: usize,
}

#[derive(Default)]
pub struct PageRegistry {
    pages: RwLock<HashMap<String, ConnectedPage>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, page: ConnectedPage) {
        tracing::info!(
            session_id = %page.session_id,
            page_id = %page.page_id,
            version = %page.version,
            "page registered"
        );
        self.pages.write().insert(page.session_id.clone(), page);
    }

    pub fn remove(&self, session_id: &str) {
        if self.pages.write().remove(session_id).is_some() {
            tracing::info!(session_id = %session_id, "page removed");
        }
    }

    /// Update `last_seen` (any inbound message counts).
    pub fn touch(&self, session_id: &str) {
        if let Some(page) = self.pages.write().get_mut(session_id) {
            page.last_seen = Utc::now();
        }
    }

    pub fn get_sink(&self, session_id: &str) -> Option<PageSink> {
        self.pages.read().get(session_id).map(|p| p.sink.clone())
    }

    pub fn operation_started(&self, session_id: &str) {
        if let Some(page) = self.pages.write().get_mut(session_id) {
            page.operations_in_flight += 1;
        }
    }

    pub fn operation_finished(&self, session_id: &str) {
        if let Some(page) = self.pages.write().get_mut(session_id) {
            page.operations_in_flight = page.operations_in_flight.saturating_sub(1);
        }
    }

    pub fn list(&self) -> Vec<PageInfo> {
        let mut pages: Vec<PageInfo> = self
            .pages
            .read()
            .values()
            .map(|p| PageInfo {
                session_id: p.session_id.clone(),
                page_id: p.page_id.clone(),
                url: p.url.clone(),
                version: p.version.clone(),
                connected_at: p.connected_at,
                last_seen: p.last_seen,
                operations_in_flight: p.operations_in_flight,
            })
            .collect();
        pages.sort_by(|a, b| a.connected_at.cmp(&b.connected_at));
        pages
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }
}
