//! Provider registry.
//!
//! Constructs and holds one adapter per supported provider. At startup the
//! registry reads the [`ProvidersConfig`] and builds a shared HTTP client;
//! credentials are not part of the registry and arrive per request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use yk_domain::config::ProvidersConfig;
use yk_domain::error::{Error, Result};
use yk_domain::provider::{ApiKey, ProviderId};

use crate::anthropic::AnthropicProvider;
use crate::google::GoogleProvider;
use crate::openai::OpenAiProvider;
use crate::traits::{NoteProvider, NoteRequest};
use crate::util::from_reqwest;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ProviderRegistry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Holds all instantiated provider adapters.
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn NoteProvider>>,
}

impl ProviderRegistry {
    /// Build every adapter from the application's [`ProvidersConfig`].
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder.build().map_err(from_reqwest)?;

        let mut registry = Self::empty();
        for id in ProviderId::ALL {
            let base_url = config.base_url(id);
            let provider: Arc<dyn NoteProvider> = match id {
                ProviderId::Gemini => Arc::new(GoogleProvider::new(base_url, client.clone())),
                ProviderId::Openai => Arc::new(OpenAiProvider::new(base_url, client.clone())),
                ProviderId::Claude => Arc::new(AnthropicProvider::new(base_url, client.clone())),
            };
            tracing::info!(provider_id = %id, base_url, "registered note provider");
            registry.insert(provider);
        }

        Ok(registry)
    }

    /// A registry with no adapters. Used with [`Self::insert`] to wire fakes
    /// in tests.
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn insert(&mut self, provider: Arc<dyn NoteProvider>) {
        self.providers.insert(provider.provider_id(), provider);
    }

    /// Look up a provider by id.
    pub fn get(&self, provider_id: ProviderId) -> Option<Arc<dyn NoteProvider>> {
        self.providers.get(&provider_id).cloned()
    }

    /// Dispatch a prompt to the provider named by `provider`.
    ///
    /// The provider string is validated before any network activity, so an
    /// unsupported value always fails with [`Error::UnknownProvider`].
    pub async fn dispatch(
        &self,
        provider: &str,
        model_alias: &str,
        api_key: &ApiKey,
        prompt: &str,
    ) -> Result<String> {
        let id: ProviderId = provider.parse()?;
        let adapter = self
            .get(id)
            .ok_or_else(|| Error::UnknownProvider(provider.to_string()))?;

        let req = NoteRequest {
            model_alias: model_alias.to_string(),
            api_key: api_key.clone(),
            prompt: prompt.to_string(),
        };

        tracing::info!(
            provider = %id,
            model = adapter.resolve_model(model_alias),
            prompt_chars = prompt.chars().count(),
            "dispatching note generation"
        );

        let note = adapter.generate(&req).await?;

        tracing::info!(provider = %id, note_chars = note.chars().count(), "note generated");
        Ok(note)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// List all registered provider IDs (sorted).
    pub fn list_providers(&self) -> Vec<ProviderId> {
        let mut ids: Vec<ProviderId> = self.providers.keys().copied().collect();
        ids.sort();
        ids
    }
}
