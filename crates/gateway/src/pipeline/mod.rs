//! The per-operation pipeline.
//!
//! One operation runs `Idle → FieldResolved → ContextCaptured → PromptBuilt →
//! AwaitingProvider → ResponseReceived → Injected → Idle`. Any failure
//! returns straight to `Idle` after the error has been shown on the page.
//! The pending indicator is shown once the field is resolved and is cleared
//! on every exit path.

pub mod followup;

use std::fmt;
use std::sync::Arc;

use yk_contextpack::{PromptBuilder, PromptInputs, PromptReport};
use yk_domain::config::PageConfig;
use yk_domain::error::{Error, Result};
use yk_domain::provider::ProviderId;
use yk_protocol::{FieldContext, PageAction, PageReply};
use yk_providers::ProviderRegistry;

use crate::settings::{resolve_api_key, SettingsStore};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Page bridge
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Request/response channel to the page context that owns the DOM.
#[async_trait::async_trait]
pub trait PageBridge: Send + Sync {
    async fn request(&self, operation_id: &str, action: PageAction) -> Result<PageReply>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// State machine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    FieldResolved,
    ContextCaptured,
    PromptBuilt,
    AwaitingProvider,
    ResponseReceived,
    Injected,
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationState::Idle => "idle",
            OperationState::FieldResolved => "field_resolved",
            OperationState::ContextCaptured => "context_captured",
            OperationState::PromptBuilt => "prompt_built",
            OperationState::AwaitingProvider => "awaiting_provider",
            OperationState::ResponseReceived => "response_received",
            OperationState::Injected => "injected",
        };
        f.write_str(s)
    }
}

struct Operation<'a> {
    id: &'a str,
    trail: Vec<OperationState>,
}

impl<'a> Operation<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            id,
            trail: vec![OperationState::Idle],
        }
    }

    fn advance(&mut self, next: OperationState) {
        let from = self.trail.last().copied().unwrap_or(OperationState::Idle);
        tracing::debug!(operation_id = self.id, from = %from, to = %next, "operation state");
        self.trail.push(next);
    }
}

/// What a finished operation did.
#[derive(Debug)]
pub struct OperationSummary {
    pub operation_id: String,
    /// Every state visited, starting and ending with `Idle`.
    pub states: Vec<OperationState>,
    pub result: Result<Completed>,
}

impl OperationSummary {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Operator-facing error text, if the operation failed.
    pub fn error_message(&self) -> Option<String> {
        self.result.as_ref().err().map(Error::user_message)
    }
}

#[derive(Debug)]
pub struct Completed {
    pub provider: ProviderId,
    pub report: PromptReport,
    pub note_chars: usize,
    /// Whether the page confirmed the write into the target field.
    pub written: bool,
    pub followups: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct Orchestrator {
    layout: PageConfig,
    registry: Arc<ProviderRegistry>,
    settings: Arc<SettingsStore>,
    builder: PromptBuilder,
}

impl Orchestrator {
    pub fn new(layout: PageConfig, registry: Arc<ProviderRegistry>, settings: Arc<SettingsStore>) -> Self {
        Self {
            layout,
            registry,
            settings,
            builder: PromptBuilder::new(),
        }
    }

    pub fn layout(&self) -> &PageConfig {
        &self.layout
    }

    /// Run one operation to completion against `page`.
    ///
    /// Never fails: errors are shown on the page and returned in the
    /// summary.
    pub async fn run(&self, page: &dyn PageBridge, operation_id: &str) -> OperationSummary {
        let mut op = Operation::new(operation_id);

        let context = match self.resolve_field(page, &mut op).await {
            Ok(context) => context,
            Err(e) => return self.fail(page, op, e, false).await,
        };

        if let Err(e) = page.request(operation_id, PageAction::ShowPending).await {
            return self.fail(page, op, e, true).await;
        }

        let done = match self.generate_and_inject(page, &mut op, context).await {
            Ok(done) => done,
            Err(e) => return self.fail(page, op, e, true).await,
        };

        // The target write already cleared the indicator on the page; this
        // covers a page that lost its pinned field meanwhile.
        if let Err(e) = page.request(operation_id, PageAction::HidePending).await {
            tracing::warn!(operation_id, error = %e, "hide_pending failed");
        }

        op.advance(OperationState::Idle);
        tracing::info!(
            operation_id,
            provider = %done.provider,
            note_chars = done.note_chars,
            followups = done.followups.len(),
            "operation complete"
        );
        OperationSummary {
            operation_id: operation_id.to_string(),
            states: op.trail,
            result: Ok(done),
        }
    }

    async fn resolve_field(&self, page: &dyn PageBridge, op: &mut Operation<'_>) -> Result<FieldContext> {
        match page.request(op.id, PageAction::GetFieldContext).await? {
            PageReply::FieldContext(ctx) if ctx.value.is_some() => {
                op.advance(OperationState::FieldResolved);
                Ok(ctx)
            }
            PageReply::FieldContext(_) => Err(Error::FieldNotFound),
            PageReply::Ack { .. } => Err(Error::Protocol(
                "expected field_context reply to get_field_context".into(),
            )),
        }
    }

    async fn generate_and_inject(
        &self,
        page: &dyn PageBridge,
        op: &mut Operation<'_>,
        context: FieldContext,
    ) -> Result<Completed> {
        let note_text = context.value.unwrap_or_default();
        op.advance(OperationState::ContextCaptured);
        tracing::debug!(
            operation_id = op.id,
            note_chars = note_text.chars().count(),
            order_chars = context.order.chars().count(),
            history_blocks = context.history.len(),
            flags = ?context.flags.present(),
            "field context captured"
        );

        let settings = self.settings.load().await?;
        let provider: ProviderId = settings.provider.parse()?;
        let (api_key, key_source) = resolve_api_key(&settings, provider)?;

        let (prompt, report) = self.builder.build(&PromptInputs {
            note_text: &note_text,
            order_text: &context.order,
            history: &context.history,
            flags: context.flags,
        });
        op.advance(OperationState::PromptBuilt);

        op.advance(OperationState::AwaitingProvider);
        tracing::info!(
            operation_id = op.id,
            provider = %provider,
            model_alias = %settings.model,
            key_source = ?key_source,
            prompt_chars = report.total_chars,
            "awaiting provider"
        );
        let note = self
            .registry
            .dispatch(provider.as_str(), &settings.model, &api_key, prompt.as_str())
            .await?;
        op.advance(OperationState::ResponseReceived);

        let written = matches!(
            page.request(
                op.id,
                PageAction::SetFieldValue {
                    value: note.clone(),
                    mode: self.layout.edit_mode,
                },
            )
            .await?,
            PageReply::Ack { success: true }
        );
        if !written {
            tracing::warn!(operation_id = op.id, "page did not confirm the note write");
        }
        op.advance(OperationState::Injected);

        let followups = self.forward_followups(page, op.id, &note).await;

        Ok(Completed {
            provider,
            report,
            note_chars: note.chars().count(),
            written,
            followups,
        })
    }

    /// Forward Plan-section questions to the secondary field. A missing field
    /// or an empty question list is not an error.
    async fn forward_followups(&self, page: &dyn PageBridge, operation_id: &str, note: &str) -> Vec<String> {
        if !self.layout.capabilities.followup_extraction {
            return Vec::new();
        }

        let questions = followup::extract_followups(note);
        if questions.is_empty() {
            return questions;
        }

        let action = PageAction::SetFollowupValue {
            value: questions.join("\n"),
        };
        match page.request(operation_id, action).await {
            Ok(PageReply::Ack { success: true }) => {
                tracing::debug!(operation_id, lines = questions.len(), "follow-up questions forwarded");
            }
            Ok(_) => {
                tracing::debug!(operation_id, "no follow-up field on page");
            }
            Err(e) => {
                tracing::warn!(operation_id, error = %e, "forwarding follow-up questions failed");
            }
        }
        questions
    }

    async fn fail(
        &self,
        page: &dyn PageBridge,
        mut op: Operation<'_>,
        error: Error,
        pending_shown: bool,
    ) -> OperationSummary {
        let operation_id = op.id;
        tracing::warn!(
            operation_id,
            state = %op.trail.last().copied().unwrap_or(OperationState::Idle),
            error = %error,
            "operation failed"
        );

        if pending_shown {
            if let Err(e) = page.request(operation_id, PageAction::HidePending).await {
                tracing::warn!(operation_id, error = %e, "hide_pending failed");
            }
        }
        let message = error.user_message();
        if let Err(e) = page.request(operation_id, PageAction::ShowError { message }).await {
            tracing::warn!(operation_id, error = %e, "show_error failed");
        }

        op.advance(OperationState::Idle);
        OperationSummary {
            operation_id: operation_id.to_string(),
            states: op.trail,
            result: Err(error),
        }
    }
}
