use yk_domain::capability::PipelineCapabilities;
use yk_domain::config::{Config, ConfigSeverity, Settings};
use yk_domain::context::EditMode;
use yk_domain::provider::ProviderId;

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn default_layout_matches_host_page_ids() {
    let config = Config::default();
    assert_eq!(config.page.order_block_id, "this-time");
    assert_eq!(config.page.history_block_ids, vec!["left".to_string()]);
    assert_eq!(config.page.edit_mode, EditMode::Replace);
}

#[test]
fn empty_file_parses_to_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.server.port, 3217);
    assert_eq!(config.providers.request_timeout_secs, 120);
    assert_eq!(config.page.capabilities, PipelineCapabilities::default());
}

#[test]
fn capabilities_parse_partially() {
    let toml_str = r#"
[page]
history_block_ids = ["left-1", "left-2"]
edit_mode = "append-after-existing"

[page.capabilities]
followup_extraction = false
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert!(!config.page.capabilities.followup_extraction);
    assert!(config.page.capabilities.multi_visit_history);
    assert_eq!(config.page.edit_mode, EditMode::AppendAfterExisting);
    assert_eq!(config.page.capabilities.max_prior_visits(), 2);
}

#[test]
fn base_url_override_is_per_provider() {
    let toml_str = r#"
[providers]
openai_base_url = "http://127.0.0.1:9999"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.providers.base_url(ProviderId::Openai), "http://127.0.0.1:9999");
    assert_eq!(
        config.providers.base_url(ProviderId::Gemini),
        "https://generativelanguage.googleapis.com"
    );
}

#[test]
fn default_config_validates_with_multi_visit_warning_only() {
    let issues = Config::default().validate();
    assert!(issues.iter().all(|i| i.severity == ConfigSeverity::Warning));
    assert!(issues.iter().any(|i| i.field == "page.history_block_ids"));
}

#[test]
fn zero_port_is_an_error() {
    let mut config = Config::default();
    config.server.port = 0;
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.severity == ConfigSeverity::Error && i.field == "server.port"));
}

#[test]
fn settings_parse_unknown_provider_as_string() {
    let toml_str = r#"
provider = "mistral"
model = "large"

[api_keys]
gemini = "g-key"
"#;
    let settings: Settings = toml::from_str(toml_str).unwrap();
    assert_eq!(settings.provider, "mistral");
    assert!(settings.provider.parse::<ProviderId>().is_err());
    assert_eq!(settings.api_key_for(ProviderId::Gemini).unwrap().expose(), "g-key");
}
