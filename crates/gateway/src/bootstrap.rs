//! AppState construction shared by `serve` and the integration tests.

use std::sync::Arc;

use anyhow::Context;
use sha2::{Digest, Sha256};

use yk_domain::config::{Config, ConfigSeverity};
use yk_providers::ProviderRegistry;

use crate::pages::registry::PageRegistry;
use crate::pages::router::PageRouter;
use crate::pipeline::Orchestrator;
use crate::settings::SettingsStore;
use crate::state::AppState;

/// Validate config, build the provider registry from it, and wire the
/// remaining services.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let registry = ProviderRegistry::from_config(&config.providers)
        .context("initializing provider registry")?;
    build_app_state_with(config, registry)
}

/// Like [`build_app_state`], with a caller-supplied provider registry.
pub fn build_app_state_with(config: Arc<Config>, registry: ProviderRegistry) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let error_count = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if error_count > 0 {
        anyhow::bail!("config validation failed with {error_count} error(s)");
    }

    // ── Providers & settings ─────────────────────────────────────────
    let llm = Arc::new(registry);
    tracing::info!(providers = llm.len(), "provider registry ready");

    let settings = Arc::new(SettingsStore::new(config.settings_path.clone()));
    tracing::info!(path = %config.settings_path.display(), "settings store ready");

    let orchestrator = Arc::new(Orchestrator::new(
        config.page.clone(),
        llm.clone(),
        settings.clone(),
    ));

    // ── Pages ────────────────────────────────────────────────────────
    let pages = Arc::new(PageRegistry::new());
    let page_router = Arc::new(PageRouter::new(
        pages.clone(),
        config.server.page_request_timeout_secs,
    ));

    // ── Page token (read once, hash for constant-time comparison) ────
    let page_token_hash = {
        let env_var = &config.server.page_token_env;
        match std::env::var(env_var).ok().filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!(source = %format!("env:{env_var}"), "page token auth enabled");
                Some(Sha256::digest(token.as_bytes()).to_vec())
            }
            None => {
                tracing::warn!("page token auth DISABLED; set the {env_var} env var");
                None
            }
        }
    };

    Ok(AppState {
        config,
        llm,
        settings,
        orchestrator,
        pages,
        page_router,
        page_token_hash,
    })
}
