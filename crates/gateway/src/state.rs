use std::sync::Arc;

use yk_domain::config::Config;
use yk_providers::ProviderRegistry;

use crate::pages::registry::PageRegistry;
use crate::pages::router::PageRouter;
use crate::pipeline::Orchestrator;
use crate::settings::SettingsStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub llm: Arc<ProviderRegistry>,
    pub settings: Arc<SettingsStore>,
    pub orchestrator: Arc<Orchestrator>,

    // ── Pages ─────────────────────────────────────────────────────────
    pub pages: Arc<PageRegistry>,
    pub page_router: Arc<PageRouter>,

    // ── Security (startup-computed) ───────────────────────────────────
    /// SHA-256 of the pre-shared page token. `None` = open endpoint.
    pub page_token_hash: Option<Vec<u8>>,
}
