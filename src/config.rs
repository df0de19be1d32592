use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub mistral: MistralConfig,
    pub server: ServerConfig,
}

#[derive(Deserialize, Clone)]
pub struct TelegramConfig {
    pub token: String,
    /// Bot API prefix, e.g. "https://api.telegram.org/bot". The token is
    /// appended directly, so no trailing slash.
    pub api_url: String,
}

#[derive(Deserialize, Clone)]
pub struct MistralConfig {
    pub token: String,
    pub model: String,
    /// Full chat-completions endpoint, not a base URL.
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MistralConfig")
            .field("token", &"<redacted>")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram", &self.telegram)
            .field("mistral", &self.mistral)
            .field("server", &self.server)
            .finish()
    }
}

impl Config {
    /// Every key is required; a missing one is reported as a parse error
    /// rather than filled with a default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
