use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TelegramConfig;
use crate::error::RelayError;

const SERVICE: &str = "telegram";

/// Inbound webhook payload. Only plain text messages are relayed, so
/// `message.chat.id` and `message.text` are required: a photo, sticker or
/// edited-message update is rejected with 400 before Mistral is called,
/// rather than spending a completion on an empty prompt. The ids are unused
/// and may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(default)]
    #[allow(dead_code)]
    pub update_id: i64,
    pub message: ReceivedMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedMessage {
    pub chat: Chat,
    pub text: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub message_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Telegram Bot API client for `sendMessage`.
pub struct TelegramClient {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}{}/sendMessage", self.config.api_url, self.config.token)
    }

    /// Single attempt; any non-2xx status is an error.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), RelayError> {
        debug!(
            "Sending message to Telegram: {}<token>/sendMessage (chat {})",
            self.config.api_url, chat_id
        );

        let response = self
            .client
            .post(self.send_message_url())
            .json(&OutboundMessage { chat_id, text })
            .send()
            .await
            .map_err(|source| RelayError::Network {
                service: SERVICE,
                // reqwest errors embed the URL, which carries the bot token.
                source: source.without_url(),
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

        Ok(())
    }
}
