//! Telegram Bot API client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::ChatTransport;
use crate::application::errors::ChatError;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// One long-poll update. Only message updates are requested.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

/// Client for the Telegram Bot API.
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    poll_timeout_seconds: u64,
}

impl TelegramClient {
    /// Create a new client. `base_url` is overridable for tests.
    pub fn new(token: String, base_url: String, poll_timeout_seconds: u64) -> Self {
        let client = Client::builder()
            // The HTTP timeout must outlast the long-poll hold time.
            .timeout(Duration::from_secs(poll_timeout_seconds + 10))
            .user_agent("vulnwatch/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            token,
            poll_timeout_seconds,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> Result<T, ChatError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        // The Bot API reports failures inside the envelope, with the
        // HTTP status mirroring it; the description is the useful part.
        let envelope: ApiEnvelope<T> = response.json().await?;
        if !envelope.ok {
            return Err(ChatError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| ChatError::Api("missing result in response".to_string()))
    }

    /// Long-poll for updates past `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ChatError> {
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &GetUpdatesRequest {
                    offset,
                    timeout: self.poll_timeout_seconds,
                    allowed_updates: &["message"],
                },
            )
            .await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), "received updates");
        }
        Ok(updates)
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ChatError> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id,
                    text,
                    parse_mode: "Markdown",
                    disable_web_page_preview: true,
                },
            )
            .await?;
        Ok(())
    }
}
