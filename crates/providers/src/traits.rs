use yk_domain::error::Result;
use yk_domain::provider::{ApiKey, ProviderId};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A provider-agnostic note generation request. Built once per operation.
#[derive(Debug, Clone)]
pub struct NoteRequest {
    /// Alias chosen on the settings surface, e.g. `gemini-pro`. Each adapter
    /// maps it to a concrete model id.
    pub model_alias: String,
    pub api_key: ApiKey,
    /// The assembled prompt, sent as a single user turn.
    pub prompt: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait that every generative-text adapter must implement.
///
/// Implementations translate a [`NoteRequest`] into the wire format of one
/// provider's HTTP API and normalize the reply to a trimmed string.
#[async_trait::async_trait]
pub trait NoteProvider: Send + Sync {
    /// Send the prompt and wait for the full generated note.
    async fn generate(&self, req: &NoteRequest) -> Result<String>;

    /// Concrete model id for a settings alias. Total: unknown aliases fall
    /// back to the provider's fast model.
    fn resolve_model(&self, alias: &str) -> &'static str;

    fn provider_id(&self) -> ProviderId;
}
