use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod llm;
mod observability;
mod page;
mod server;
mod settings;

pub use llm::*;
pub use observability::*;
pub use page::*;
pub use server::*;
pub use settings::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Service configuration (`config.toml`). Owned by the operator of the
/// orchestrator, distinct from the persisted provider [`Settings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Path of the persisted settings store, re-read on every operation.
    #[serde(default = "d_settings_path")]
    pub settings_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            page: PageConfig::default(),
            providers: ProvidersConfig::default(),
            observability: ObservabilityConfig::default(),
            settings_path: d_settings_path(),
        }
    }
}

fn d_settings_path() -> PathBuf {
    PathBuf::from("settings.toml")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.page.order_block_id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "page.order_block_id".into(),
                message: "order block id must not be empty".into(),
            });
        }

        if self.page.history_block_ids.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "page.history_block_ids".into(),
                message: "no prior-visit blocks configured; history will always be empty".into(),
            });
        }

        if self.page.capabilities.multi_visit_history && self.page.history_block_ids.len() < 2 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "page.history_block_ids".into(),
                message: "multi_visit_history is enabled but fewer than two blocks are configured"
                    .into(),
            });
        }

        for (name, url) in self.providers.base_urls() {
            if url.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: format!("providers.{name}_base_url"),
                    message: "base url must not be empty".into(),
                });
            }
        }

        if self.providers.request_timeout_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "providers.request_timeout_secs".into(),
                message: "0 disables the request timeout; a hung provider leaves the pending indicator up"
                    .into(),
            });
        }

        errors
    }
}
