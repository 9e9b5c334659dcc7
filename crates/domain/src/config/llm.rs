use serde::{Deserialize, Serialize};

use crate::provider::ProviderId;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provider endpoints
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Transport settings for the provider adapters. Credentials and model
/// selection live in [`super::Settings`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "d_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "d_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "d_claude_base_url")]
    pub claude_base_url: String,
    /// Whole-request timeout for provider calls. `0` disables it.
    #[serde(default = "d_120")]
    pub request_timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini_base_url: d_gemini_base_url(),
            openai_base_url: d_openai_base_url(),
            claude_base_url: d_claude_base_url(),
            request_timeout_secs: 120,
        }
    }
}

impl ProvidersConfig {
    pub fn base_url(&self, provider: ProviderId) -> &str {
        match provider {
            ProviderId::Gemini => &self.gemini_base_url,
            ProviderId::Openai => &self.openai_base_url,
            ProviderId::Claude => &self.claude_base_url,
        }
    }

    pub fn base_urls(&self) -> impl Iterator<Item = (&'static str, &str)> {
        ProviderId::ALL
            .into_iter()
            .map(move |p| (p.as_str(), self.base_url(p)))
    }
}

fn d_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn d_openai_base_url() -> String {
    "https://api.openai.com".into()
}

fn d_claude_base_url() -> String {
    "https://api.anthropic.com".into()
}

fn d_120() -> u64 {
    120
}
