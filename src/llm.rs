use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::MistralConfig;
use crate::error::RelayError;

/// Returned in place of a reply when the model produces no choices.
pub const FALLBACK_REPLY: &str = "no response";

const SERVICE: &str = "mistral";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

// Response DTOs are lenient: absent or null fields decode as empty, so a
// body without usable choices ends in FALLBACK_REPLY instead of an error.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default, deserialize_with = "null_as_default")]
    message: ReplyMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub struct LlmClient {
    client: reqwest::Client,
    config: MistralConfig,
}

impl LlmClient {
    pub fn new(config: MistralConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send `text` as a single user message and return the first choice.
    pub async fn complete(&self, text: &str) -> Result<String, RelayError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
        };

        debug!("Sending request to Mistral: {}", self.config.api_url);

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| RelayError::Network {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                service: SERVICE,
                status,
                body,
            });
        }

        let body = response.text().await.map_err(|source| RelayError::Network {
            service: SERVICE,
            source,
        })?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|source| RelayError::Decode {
                service: SERVICE,
                source,
            })?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}
