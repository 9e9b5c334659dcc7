pub mod config;
pub mod settings;

use clap::{Parser, Subcommand};

/// yakureki-gateway: orchestrates SOAP note brush-ups for connected pages.
#[derive(Debug, Parser)]
#[command(name = "yakureki-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the gateway server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Inspect the persisted provider settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the selected provider and model, and where its key comes from
    /// (masked).
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `YK_CONFIG` (or `config.toml` by
/// default). A missing file yields the defaults. Returns the parsed config
/// and the path that was used.
pub fn load_config() -> anyhow::Result<(yk_domain::config::Config, String)> {
    let config_path = std::env::var("YK_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        yk_domain::config::Config::default()
    };

    Ok((config, config_path))
}
