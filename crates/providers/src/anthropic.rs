//! Anthropic Messages API adapter.

use serde_json::Value;
use yk_domain::error::Result;
use yk_domain::provider::ProviderId;

use crate::traits::{NoteProvider, NoteRequest};
use crate::util::{normalize_text, send_json};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const SONNET_ALIAS: &str = "claude-sonnet";
const SONNET_MODEL: &str = "claude-sonnet-4-20250514";
const HAIKU_MODEL: &str = "claude-haiku-4-20250514";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct AnthropicProvider {
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn authed_post(&self, url: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
    }
}

pub fn build_body(model: &str, prompt: &str) -> Value {
    serde_json::json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "messages": [{"role": "user", "content": prompt}],
    })
}

/// First content block's text.
pub fn extract_text(body: &Value) -> Option<&str> {
    body.get("content")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl NoteProvider for AnthropicProvider {
    async fn generate(&self, req: &NoteRequest) -> Result<String> {
        let model = self.resolve_model(&req.model_alias);
        let url = format!("{}/v1/messages", self.base_url);

        tracing::debug!(provider = "claude", model, url = %url, "claude generate request");

        let resp = send_json(
            ProviderId::Claude,
            self.authed_post(&url, req.api_key.expose())
                .json(&build_body(model, &req.prompt)),
        )
        .await?;

        normalize_text(ProviderId::Claude, extract_text(&resp))
    }

    fn resolve_model(&self, alias: &str) -> &'static str {
        if alias == SONNET_ALIAS {
            SONNET_MODEL
        } else {
            HAIKU_MODEL
        }
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::Claude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sonnet_alias_selects_sonnet() {
        let p = AnthropicProvider::new("https://example.test", reqwest::Client::new());
        assert_eq!(p.resolve_model("claude-sonnet"), "claude-sonnet-4-20250514");
        assert_eq!(p.resolve_model("claude-haiku"), "claude-haiku-4-20250514");
        assert_eq!(p.resolve_model("anything"), "claude-haiku-4-20250514");
    }

    #[test]
    fn body_caps_output_tokens() {
        let body = build_body("claude-haiku-4-20250514", "p");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn extracts_first_block_text() {
        let body = serde_json::json!({
            "content": [{"type": "text", "text": " S: 良好\n"}],
            "stop_reason": "end_turn"
        });
        assert_eq!(extract_text(&body), Some(" S: 良好\n"));
    }
}
