use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_3217")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
    /// How long the orchestrator waits for a page to answer one request.
    #[serde(default = "d_30")]
    pub page_request_timeout_secs: u64,
    /// Env var holding the pre-shared token pages must present on connect.
    /// When the variable is unset the endpoint is open (local development).
    #[serde(default = "d_page_token_env")]
    pub page_token_env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3217,
            host: "127.0.0.1".into(),
            page_request_timeout_secs: 30,
            page_token_env: d_page_token_env(),
        }
    }
}

fn d_3217() -> u16 {
    3217
}

fn d_host() -> String {
    "127.0.0.1".into()
}

fn d_30() -> u64 {
    30
}

fn d_page_token_env() -> String {
    "YK_PAGE_TOKEN".into()
}
