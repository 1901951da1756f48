//! Configuration error types.

/// Errors raised while building or loading a worker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid_url(input: &str, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            input: input.to_string(),
            source,
        }
    }
}
