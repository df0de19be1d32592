use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while loading `config.toml` at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while relaying one webhook update.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request never produced a response (connect, TLS, reset, timeout).
    #[error("request to {service} failed: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{service} responded with {status}")]
    Upstream {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode {service} payload: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
