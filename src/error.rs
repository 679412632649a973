use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoginFormError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("os rng error: {message}")]
    OsRng { message: String },

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("provider is disabled: {0}")]
    ProviderDisabled(String),

    #[error("unknown identification type: {0}")]
    UnknownIdentificationType(String),

    #[error("malformed action value: {0}")]
    MalformedAction(String),

    #[error("invalid setting for provider {provider}: {setting}")]
    InvalidSetting { provider: String, setting: String },

    #[error("authorize failed for provider {provider}: {message}")]
    Authorize { provider: String, message: String },
}
