use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use tracing::{error, info};

use crate::config::Config;
use crate::error::RelayError;
use crate::llm::LlmClient;
use crate::platform::telegram::{TelegramClient, Update};

pub const ACK_BODY: &str = "Message received and answered.";

/// Shared application state. Read-only after startup.
pub struct AppState {
    llm: LlmClient,
    telegram: TelegramClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            llm: LlmClient::new(config.mistral),
            telegram: TelegramClient::new(config.telegram),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .with_state(state)
}

/// Decode, complete, send, respond. The first failing stage ends the request.
async fn handle_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, String) {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(source) => {
            let e = RelayError::Decode {
                service: "webhook",
                source,
            };
            error!("Rejected webhook body: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let chat_id = update.message.chat.id;
    let text = update.message.text;
    info!("Message received from chat {}: {}", chat_id, text);

    let reply = match state.llm.complete(&text).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Failed to get completion for chat {}: {}", chat_id, e);
            if let RelayError::Upstream { body, .. } = &e {
                error!("Mistral error body: {}", body);
            }
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    if let Err(e) = state.telegram.send_message(chat_id, &reply).await {
        error!("Failed to send reply to chat {}: {}", chat_id, e);
        if let RelayError::Upstream { body, .. } = &e {
            error!("Telegram error body: {}", body);
        }
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    (StatusCode::OK, ACK_BODY.to_string())
}

/// Serve `POST /webhook` until Ctrl-C.
pub async fn run(state: Arc<AppState>, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Webhook server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
