//! Read-only access to the persisted provider settings.
//!
//! The settings file belongs to the settings surface; the gateway never
//! writes it. It is re-read at the start of every operation so that a change
//! made between two operations takes effect without a restart.

use std::path::{Path, PathBuf};

use yk_domain::config::Settings;
use yk_domain::error::{Error, Result};
use yk_domain::provider::{ApiKey, ProviderId};

/// Where the provider credentials for one operation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Settings,
    Env,
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current settings. A missing file yields the defaults.
    pub async fn load(&self) -> Result<Settings> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "settings file absent, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("parsing {}: {e}", self.path.display())))
    }
}

/// Resolve the credential for `provider`: the settings entry first, then the
/// `YK_<PROVIDER>_API_KEY` environment variable.
pub fn resolve_api_key(settings: &Settings, provider: ProviderId) -> Result<(ApiKey, KeySource)> {
    if let Some(key) = settings.api_key_for(provider) {
        return Ok((key, KeySource::Settings));
    }

    std::env::var(provider.api_key_env())
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(|k| (ApiKey::new(k), KeySource::Env))
        .ok_or_else(|| Error::MissingApiKey(provider.as_str().to_string()))
}

/// Mask a key for display: first four characters, then asterisks.
pub fn mask_key(key: &ApiKey) -> String {
    let raw = key.expose();
    let visible: String = raw.chars().take(4).collect();
    if raw.chars().count() <= 8 {
        "****".into()
    } else {
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let settings = store.load().await.unwrap();
        assert_eq!(settings.provider, "gemini");
        assert_eq!(settings.model, "gemini-flash");
    }

    #[tokio::test]
    async fn file_is_reread_on_every_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider = \"openai\"\nmodel = \"gpt-4o\"").unwrap();
        let store = SettingsStore::new(file.path());
        assert_eq!(store.load().await.unwrap().provider, "openai");

        std::fs::write(file.path(), "provider = \"claude\"\n").unwrap();
        let settings = store.load().await.unwrap();
        assert_eq!(settings.provider, "claude");
        assert_eq!(settings.model, "gemini-flash");
    }

    #[tokio::test]
    async fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider = [").unwrap();
        let err = SettingsStore::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn settings_key_wins() {
        let mut settings = Settings::default();
        settings.api_keys.insert("gemini".into(), "AIza-settings".into());
        let (key, source) = resolve_api_key(&settings, ProviderId::Gemini).unwrap();
        assert_eq!(key.expose(), "AIza-settings");
        assert_eq!(source, KeySource::Settings);
    }

    #[test]
    fn missing_key_names_the_provider() {
        // No test sets YK_CLAUDE_API_KEY.
        let err = resolve_api_key(&Settings::default(), ProviderId::Claude).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey(ref p) if p == "claude"));
    }

    #[test]
    fn mask_hides_short_keys_entirely() {
        assert_eq!(mask_key(&ApiKey::new("abc")), "****");
        assert_eq!(mask_key(&ApiKey::new("sk-abcdefghijk")), "sk-a****");
    }
}
