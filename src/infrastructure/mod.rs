//! Infrastructure Layer - External concerns and implementations
//!
//! This module handles the GitHub API, the Telegram Bot API and the
//! recipient registry store.

pub mod api_clients;
pub mod chat;
pub mod registry;
pub mod repositories;

pub use api_clients::{AlertSourceClient, DependabotAlertClient};
pub use chat::{ChatTransport, TelegramClient};
pub use registry::{FileRegistry, RecipientRegistry};
pub use repositories::{AlertRepository, ScanningAlertRepository, normalize_alert};
