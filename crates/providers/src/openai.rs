//! OpenAI Chat Completions adapter.

use serde_json::Value;
use yk_domain::error::Result;
use yk_domain::provider::ProviderId;

use crate::traits::{NoteProvider, NoteRequest};
use crate::util::{normalize_text, send_json};

const FULL_MODEL: &str = "gpt-4o";
const MINI_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.3;

pub struct OpenAiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

pub fn build_body(model: &str, prompt: &str) -> Value {
    serde_json::json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": TEMPERATURE,
    })
}

/// First choice's message content.
pub fn extract_text(body: &Value) -> Option<&str> {
    body.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
}

#[async_trait::async_trait]
impl NoteProvider for OpenAiProvider {
    async fn generate(&self, req: &NoteRequest) -> Result<String> {
        let model = self.resolve_model(&req.model_alias);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(provider = "openai", model, url = %url, "openai generate request");

        let resp = send_json(
            ProviderId::Openai,
            self.client
                .post(&url)
                .header("Authorization", format!("Bearer {}", req.api_key.expose()))
                .header("Content-Type", "application/json")
                .json(&build_body(model, &req.prompt)),
        )
        .await?;

        normalize_text(ProviderId::Openai, extract_text(&resp))
    }

    fn resolve_model(&self, alias: &str) -> &'static str {
        if alias == FULL_MODEL {
            FULL_MODEL
        } else {
            MINI_MODEL
        }
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::Openai
    }
}
