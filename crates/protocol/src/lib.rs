//! Page protocol: WebSocket message types exchanged between a page context
//! (owns the DOM) and the gateway (owns network access and settings).
//!
//! Every gateway → page request carries the `operation_id` the page assigned
//! when the operator triggered the action, so the page can resolve it to the
//! field that was targeted at that moment.

use serde::{Deserialize, Serialize};

use yk_domain::config::PageConfig;
use yk_domain::context::{ContextBlock, EditMode};
use yk_domain::flags::FlagSet;

/// WebSocket message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    /// Page → Gateway: initial handshake.
    #[serde(rename = "page_hello")]
    PageHello {
        page_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        version: String,
    },

    /// Gateway → Page: handshake accepted. Carries the element layout the
    /// page should use to locate its regions.
    #[serde(rename = "gateway_welcome")]
    GatewayWelcome {
        session_id: String,
        gateway_version: String,
        layout: PageConfig,
    },

    /// Page → Gateway: the operator invoked the action on a targeted field.
    #[serde(rename = "trigger")]
    Trigger { operation_id: String },

    /// Gateway → Page: perform one action for an operation.
    #[serde(rename = "page_request")]
    PageRequest {
        request_id: String,
        operation_id: String,
        action: PageAction,
    },

    /// Page → Gateway: result of a [`PageMessage::PageRequest`].
    #[serde(rename = "page_response")]
    PageResponse { request_id: String, reply: PageReply },

    /// Gateway → Page: the operation finished (after the indicator cleared).
    #[serde(rename = "operation_done")]
    OperationDone {
        operation_id: String,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Bidirectional: heartbeat.
    #[serde(rename = "ping")]
    Ping { timestamp: i64 },

    /// Bidirectional: heartbeat response.
    #[serde(rename = "pong")]
    Pong { timestamp: i64 },
}

/// Actions the gateway can ask a page to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PageAction {
    /// Read the pinned field and capture the surrounding context.
    GetFieldContext,
    /// Write generated text into the pinned field.
    SetFieldValue {
        value: String,
        #[serde(default)]
        mode: EditMode,
    },
    /// Write follow-up questions into the secondary field, if one exists.
    SetFollowupValue { value: String },
    ShowPending,
    HidePending,
    ShowError { message: String },
}

impl PageAction {
    /// Short name for logs. Never includes payload text.
    pub fn name(&self) -> &'static str {
        match self {
            PageAction::GetFieldContext => "get_field_context",
            PageAction::SetFieldValue { .. } => "set_field_value",
            PageAction::SetFollowupValue { .. } => "set_followup_value",
            PageAction::ShowPending => "show_pending",
            PageAction::HidePending => "hide_pending",
            PageAction::ShowError { .. } => "show_error",
        }
    }
}

/// Page replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageReply {
    FieldContext(FieldContext),
    Ack { success: bool },
}

impl PageReply {
    pub fn ok() -> Self {
        PageReply::Ack { success: true }
    }
}

/// Snapshot captured by the page for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldContext {
    /// Current text of the pinned field; `None` when no field is pinned.
    pub value: Option<String>,
    #[serde(default)]
    pub order: String,
    /// Prior-visit blocks, most recent first, marker lines removed.
    #[serde(default)]
    pub history: Vec<ContextBlock>,
    #[serde(default)]
    pub flags: FlagSet,
}

impl FieldContext {
    pub fn no_field() -> Self {
        Self::default()
    }
}
