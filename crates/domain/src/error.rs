/// Shared error type used across all yakureki-assist crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No eligible field was targeted when the operation started.
    #[error("no editable field is targeted")]
    FieldNotFound,

    /// No credential is stored for the selected provider.
    #[error("no API key configured for provider '{0}'")]
    MissingApiKey(String),

    /// Configuration names a provider outside the supported set.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The provider answered with a non-2xx status.
    #[error("provider {provider}: HTTP {status} - {body}")]
    ProviderHttp {
        provider: String,
        status: u16,
        body: String,
    },

    /// The provider answered 2xx but carried no extractable text.
    #[error("provider {0}: response contained no text")]
    EmptyResponse(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("page protocol: {0}")]
    Protocol(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Operator-facing message rendered by the page notification.
    pub fn user_message(&self) -> String {
        match self {
            Error::FieldNotFound => "テキストエリアの内容を取得できませんでした".into(),
            Error::MissingApiKey(_) => {
                "APIキーが設定されていません。拡張機能のアイコンをクリックして設定してください。"
                    .into()
            }
            Error::UnknownProvider(p) => format!("不明なプロバイダー: {p}"),
            Error::ProviderHttp {
                provider,
                status,
                body,
            } => format!("{} API失敗 ({status}): {body}", provider_label(provider)),
            Error::EmptyResponse(provider) => {
                format!("{}から有効な応答が得られませんでした", provider_label(provider))
            }
            other => format!("エラーが発生しました: {other}"),
        }
    }
}

fn provider_label(provider: &str) -> &str {
    match provider {
        "gemini" => "Gemini",
        "openai" => "OpenAI",
        "claude" => "Claude",
        other => other,
    }
}
