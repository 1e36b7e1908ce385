//! Recipient registry - persistent store of activated chats

pub mod file_store;

pub use file_store::FileRegistry;

use async_trait::async_trait;

use crate::application::errors::RegistryError;
use crate::domain::Registration;

/// Keyed store of registered report recipients.
///
/// The pipeline only needs lookup-by-id, insert-if-absent and list-all;
/// any persistent key-value mechanism can implement this.
#[async_trait]
pub trait RecipientRegistry: Send + Sync {
    async fn is_registered(&self, chat_id: i64) -> Result<bool, RegistryError>;

    /// Register a chat. Returns `true` only when the chat was not
    /// registered before; repeat registrations leave the stored record
    /// untouched.
    async fn register(&self, chat_id: i64, username: Option<&str>) -> Result<bool, RegistryError>;

    async fn all_ids(&self) -> Result<Vec<i64>, RegistryError>;

    async fn get(&self, chat_id: i64) -> Result<Option<Registration>, RegistryError>;
}
