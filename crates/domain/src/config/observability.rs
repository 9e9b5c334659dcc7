use serde::{Deserialize, Serialize};

/// Logging configuration. Diagnostic output only; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "d_log_filter")]
    pub log_filter: String,
    /// Emit JSON lines instead of the compact human format.
    #[serde(default = "d_true")]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: d_log_filter(),
            json: true,
        }
    }
}

fn d_log_filter() -> String {
    "info,yk_gateway=debug".into()
}

fn d_true() -> bool {
    true
}
