use yk_domain::config::Config;
use yk_domain::provider::ProviderId;

use crate::settings::{mask_key, resolve_api_key, KeySource, SettingsStore};

/// Print the provider selection the next operation would use.
pub async fn show(config: &Config) -> anyhow::Result<()> {
    let store = SettingsStore::new(config.settings_path.clone());
    let settings = store.load().await?;

    println!("settings file: {}", store.path().display());
    println!("provider:      {}", settings.provider);
    println!("model alias:   {}", settings.model);

    match settings.provider.parse::<ProviderId>() {
        Ok(id) => match resolve_api_key(&settings, id) {
            Ok((key, source)) => {
                let from = match source {
                    KeySource::Settings => "settings".to_string(),
                    KeySource::Env => format!("env:{}", id.api_key_env()),
                };
                println!("api key:       {} ({from})", mask_key(&key));
            }
            Err(e) => println!("api key:       missing ({e})"),
        },
        Err(e) => println!("api key:       n/a ({e})"),
    }

    if !settings.focus_items.is_empty() {
        println!("focus items:   {}", settings.focus_items.join(", "));
    }

    Ok(())
}
