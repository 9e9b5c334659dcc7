//! Page request router: sends `page_request` messages to a connected page and
//! waits for the matching `page_response`.
//!
//! Requests are correlated by `request_id` through oneshot channels. When a
//! page disconnects, everything still outstanding for its session fails at
//! once instead of waiting out the timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use yk_domain::error::{Error, Result};
use yk_protocol::{PageAction, PageMessage, PageReply};

use super::registry::PageRegistry;
use crate::pipeline::PageBridge;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pending request tracker
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct PendingRequest {
    session_id: String,
    tx: oneshot::Sender<Result<PageReply>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PageRouter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct PageRouter {
    pages: Arc<PageRegistry>,
    /// request_id → pending oneshot sender + owning session.
    pending: Mutex<HashMap<String, PendingRequest>>,
    timeout: Duration,
    /// Maximum outstanding requests per page session (0 = unlimited).
    max_pending_per_session: usize,
}

impl PageRouter {
    pub fn new(pages: Arc<PageRegistry>, timeout_secs: u64) -> Self {
        Self {
            pages,
            pending: Mutex::new(HashMap::new()),
            timeout: Duration::from_secs(timeout_secs),
            max_pending_per_session: 32,
        }
    }

    /// Send one action to the page behind `session_id` and wait for its reply.
    pub async fn request(
        &self,
        session_id: &str,
        operation_id: &str,
        action: PageAction,
    ) -> Result<PageReply> {
        if self.max_pending_per_session > 0 {
            let pending = self.pending.lock();
            let count = pending
                .values()
                .filter(|p| p.session_id == session_id)
                .count();
            if count >= self.max_pending_per_session {
                return Err(Error::Protocol(format!(
                    "pending limit reached ({count} requests in flight for session {session_id})"
                )));
            }
        }

        let sink = self
            .pages
            .get_sink(session_id)
            .ok_or_else(|| Error::Protocol(format!("page session {session_id} not connected")))?;

        let request_id = uuid::Uuid::new_v4().to_string();
        let action_name = action.name();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(
            request_id.clone(),
            PendingRequest {
                session_id: session_id.to_string(),
                tx,
            },
        );

        let msg = PageMessage::PageRequest {
            request_id: request_id.clone(),
            operation_id: operation_id.to_string(),
            action,
        };
        if sink.send(msg).await.is_err() {
            self.pending.lock().remove(&request_id);
            return Err(Error::Protocol(format!(
                "failed to send to page session {session_id}"
            )));
        }

        tracing::trace!(session_id, operation_id, request_id = %request_id, action = action_name, "page request sent");

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(Error::Protocol(format!(
                "page session {session_id} dropped request {action_name}"
            ))),
            Err(_) => {
                self.pending.lock().remove(&request_id);
                Err(Error::Timeout(format!(
                    "page did not answer {action_name} within {}s",
                    self.timeout.as_secs()
                )))
            }
        }
    }

    /// Called by the WS handler when a page sends a `page_response`.
    pub fn complete_request(&self, request_id: &str, reply: PageReply) {
        if let Some(pending) = self.pending.lock().remove(request_id) {
            let _ = pending.tx.send(Ok(reply));
        } else {
            tracing::warn!(request_id = %request_id, "received page_response for unknown request");
        }
    }

    /// Fail every outstanding request for a disconnected session. Returns the
    /// number failed.
    pub fn fail_pending_for_session(&self, session_id: &str) -> usize {
        let mut pending = self.pending.lock();
        let failed: Vec<String> = pending
            .iter()
            .filter(|(_, p)| p.session_id == session_id)
            .map(|(id, _)| id.clone())
            .collect();

        for request_id in &failed {
            if let Some(p) = pending.remove(request_id) {
                let _ = p.tx.send(Err(Error::Protocol(format!(
                    "page session {session_id} disconnected"
                ))));
            }
        }

        if !failed.is_empty() {
            tracing::warn!(
                session_id = %session_id,
                failed_requests = failed.len(),
                "failed in-flight page requests for disconnected session"
            );
        }
        failed.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// A [`PageBridge`] bound to one page session.
    pub fn bridge(self: &Arc<Self>, session_id: impl Into<String>) -> SessionBridge {
        SessionBridge {
            router: Arc::clone(self),
            session_id: session_id.into(),
        }
    }
}

/// Routes pipeline requests to one connected page.
pub struct SessionBridge {
    router: Arc<PageRouter>,
    session_id: String,
}

#[async_trait::async_trait]
impl PageBridge for SessionBridge {
    async fn request(&self, operation_id: &str, action: PageAction) -> Result<PageReply> {
        self.router.request(&self.session_id, operation_id, action).await
    }
}
