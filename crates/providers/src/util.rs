//! Shared utility functions for provider adapters.

use serde_json::Value;
use yk_domain::error::{Error, Result};
use yk_domain::provider::ProviderId;

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Send a prepared request and decode the JSON body.
///
/// Non-2xx responses surface the status and the raw body text unchanged.
pub(crate) async fn send_json(provider: ProviderId, req: reqwest::RequestBuilder) -> Result<Value> {
    let resp = req.send().await.map_err(from_reqwest)?;

    let status = resp.status();
    let resp_text = resp.text().await.map_err(from_reqwest)?;

    if !status.is_success() {
        tracing::warn!(
            provider = %provider,
            status = status.as_u16(),
            "provider returned non-success status"
        );
        return Err(Error::ProviderHttp {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: resp_text,
        });
    }

    Ok(serde_json::from_str(&resp_text)?)
}

/// Trim extracted text; a missing or blank value is an empty response.
pub(crate) fn normalize_text(provider: ProviderId, text: Option<&str>) -> Result<String> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(Error::EmptyResponse(provider.to_string())),
    }
}

/// Redact API key from URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}
