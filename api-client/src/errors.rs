// API client errors

use flapjack_diner_core::ValidationError;

/// Errors returned by every client operation
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A parameter was missing or had the wrong type; nothing was sent
    #[error("invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    /// The client configuration is unusable
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connection failure, timeout or non-2xx status
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("base URL is empty")]
    EmptyBaseUrl,

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported protocol {0:?} (expected http or https)")]
    UnsupportedProtocol(String),

    #[error("base URL {0:?} has no host")]
    MissingHost(String),

    #[error("timeout must be at least one second")]
    ZeroTimeout,

    #[error("invalid timeout {value:?}: {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
