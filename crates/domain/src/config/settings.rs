use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::provider::{ApiKey, ProviderId};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Persisted provider settings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings written by the settings surface and read (never written) by the
/// orchestrator at the start of each operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Selected provider id. Kept as a string so that an unsupported value
    /// surfaces as `UnknownProvider` instead of a parse failure.
    #[serde(default = "d_provider")]
    pub provider: String,
    /// Selected model alias, interpreted by the provider adapter.
    #[serde(default = "d_model")]
    pub model: String,
    /// Provider id → API key.
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
    /// Emphasis topics chosen by the operator. Carried, not interpreted.
    #[serde(default)]
    pub focus_items: Vec<String>,
    #[serde(default)]
    pub focus_comment: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: d_provider(),
            model: d_model(),
            api_keys: HashMap::new(),
            focus_items: Vec::new(),
            focus_comment: String::new(),
        }
    }
}

impl Settings {
    /// The stored key for `provider`, ignoring blank entries.
    pub fn api_key_for(&self, provider: ProviderId) -> Option<ApiKey> {
        self.api_keys
            .get(provider.as_str())
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(ApiKey::new)
    }
}

fn d_provider() -> String {
    "gemini".into()
}

fn d_model() -> String {
    "gemini-flash".into()
}
