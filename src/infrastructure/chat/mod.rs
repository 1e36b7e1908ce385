//! Chat delivery transport

pub mod telegram;

pub use telegram::TelegramClient;

use async_trait::async_trait;

use crate::application::errors::ChatError;

/// Transport that delivers a pre-rendered text message to a recipient.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ChatError>;
}
