//! Page-side state: the targeted field, per-operation pins, the pending
//! indicator and the transient notification.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use yk_domain::config::PageConfig;
use yk_protocol::{PageAction, PageReply};

use crate::dom::{Document, NodeHandle};
use crate::injector;
use crate::locator::FieldLocator;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Label rendered inside the pending overlay.
pub const PENDING_LABEL: &str = "AIがブラッシュアップ中...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    shown_at: Instant,
}

impl Notification {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTIFICATION_TTL
    }
}

/// Overlay drawn over the pinned field while an operation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingIndicator {
    pub anchor: NodeHandle,
}

#[derive(Debug)]
pub struct Page {
    doc: Document,
    locator: FieldLocator,
    /// Last eligible field the operator right-clicked.
    targeted: Option<NodeHandle>,
    /// Target captured when each operation was triggered.
    pins: HashMap<String, Option<NodeHandle>>,
    pending: Option<PendingIndicator>,
    notification: Option<Notification>,
}

impl Page {
    pub fn new(doc: Document, layout: PageConfig) -> Self {
        Self {
            doc,
            locator: FieldLocator::new(layout),
            targeted: None,
            pins: HashMap::new(),
            pending: None,
            notification: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn layout(&self) -> &PageConfig {
        self.locator.layout()
    }

    /// Adopt the layout announced by the gateway.
    pub fn set_layout(&mut self, layout: PageConfig) {
        self.locator = FieldLocator::new(layout);
    }

    // ── Operator actions ───────────────────────────────────────────

    /// Context-menu click. Only eligible fields become the target; clicks
    /// elsewhere leave the previous target in place.
    pub fn context_menu(&mut self, handle: NodeHandle) -> bool {
        let eligible = self
            .doc
            .element(handle)
            .is_some_and(|e| e.kind.is_eligible_target());
        if eligible {
            self.targeted = Some(handle);
        }
        eligible
    }

    pub fn targeted(&self) -> Option<NodeHandle> {
        self.targeted
    }

    /// Start an operation and pin the current target to a fresh id.
    pub fn begin_operation(&mut self) -> String {
        let operation_id = uuid::Uuid::new_v4().to_string();
        self.begin_operation_with_id(&operation_id);
        operation_id
    }

    pub fn begin_operation_with_id(&mut self, operation_id: &str) {
        tracing::debug!(operation_id, pinned = self.targeted.is_some(), "operation started");
        self.pins.insert(operation_id.to_string(), self.targeted);
    }

    pub fn end_operation(&mut self, operation_id: &str) {
        self.pins.remove(operation_id);
    }

    pub fn pinned(&self, operation_id: &str) -> Option<NodeHandle> {
        self.pins.get(operation_id).copied().flatten()
    }

    // ── Gateway requests ───────────────────────────────────────────

    pub fn handle(&mut self, operation_id: &str, action: &PageAction) -> PageReply {
        let target = self.pinned(operation_id);
        tracing::debug!(operation_id, action = action.name(), "page action");

        match action {
            PageAction::GetFieldContext => {
                PageReply::FieldContext(self.locator.capture(&self.doc, target))
            }
            PageAction::SetFieldValue { value, mode } => {
                let written = target
                    .and_then(|t| injector::inject(&mut self.doc, t, value, *mode))
                    .is_some();
                self.hide_pending();
                PageReply::Ack { success: written }
            }
            PageAction::SetFollowupValue { value } => {
                let field = self
                    .doc
                    .get_element_by_id(&self.locator.layout().followup_field_id)
                    .filter(|h| {
                        self.doc
                            .element(*h)
                            .is_some_and(|e| e.kind.is_eligible_target())
                    });
                let written = match field {
                    Some(h) => self.doc.write_value(h, value),
                    None => false,
                };
                PageReply::Ack { success: written }
            }
            PageAction::ShowPending => {
                self.hide_pending();
                self.pending = target.map(|anchor| PendingIndicator { anchor });
                PageReply::ok()
            }
            PageAction::HidePending => {
                self.hide_pending();
                PageReply::ok()
            }
            PageAction::ShowError { message } => {
                self.hide_pending();
                self.notify(message, NotificationKind::Error);
                PageReply::ok()
            }
        }
    }

    // ── Visual state ───────────────────────────────────────────────

    pub fn pending(&self) -> Option<PendingIndicator> {
        self.pending
    }

    fn hide_pending(&mut self) {
        self.pending = None;
    }

    /// Replace any current notification.
    pub fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.notification = Some(Notification {
            message: message.to_string(),
            kind,
            shown_at: Instant::now(),
        });
    }

    /// The notification on screen at `now`, if it has not yet expired.
    pub fn notification_at(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_visible_at(now))
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }
}
