//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API. Auth is via an API key
//! passed as a query parameter (`key={api_key}`).

use serde_json::Value;
use yk_domain::error::Result;
use yk_domain::provider::ProviderId;

use crate::traits::{NoteProvider, NoteRequest};
use crate::util::{normalize_text, redact_url_key, send_json};

const PRO_ALIAS: &str = "gemini-pro";
const PRO_MODEL: &str = "gemini-2.5-pro";
const FLASH_MODEL: &str = "gemini-2.0-flash";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct GoogleProvider {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn generate_url(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, api_key
        )
    }
}

/// Request body: the prompt as the single part of a single content entry.
pub fn build_body(prompt: &str) -> Value {
    serde_json::json!({
        "contents": [{
            "parts": [{"text": prompt}]
        }]
    })
}

/// First candidate's first text part.
pub fn extract_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl NoteProvider for GoogleProvider {
    async fn generate(&self, req: &NoteRequest) -> Result<String> {
        let model = self.resolve_model(&req.model_alias);
        let url = self.generate_url(model, req.api_key.expose());

        tracing::debug!(provider = "gemini", model, url = %redact_url_key(&url), "gemini generate request");

        let resp = send_json(
            ProviderId::Gemini,
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&build_body(&req.prompt)),
        )
        .await?;

        normalize_text(ProviderId::Gemini, extract_text(&resp))
    }

    fn resolve_model(&self, alias: &str) -> &'static str {
        if alias == PRO_ALIAS {
            PRO_MODEL
        } else {
            FLASH_MODEL
        }
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::Gemini
    }
}
