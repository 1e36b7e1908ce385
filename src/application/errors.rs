//! Application layer error types

use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Alert source error: {0}")]
    Source(#[from] AlertSourceError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Chat delivery error: {0}")]
    Chat(#[from] ChatError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the alert source.
///
/// Only repository listing failures surface here; per-repository fetch
/// problems are absorbed inside the client and logged, so a single
/// inaccessible repository never aborts a scan.
#[derive(Error, Debug)]
pub enum AlertSourceError {
    #[error("repository listing failed: {0}")]
    Transport(String),
}

/// Errors from the recipient registry store
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the chat delivery transport
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("telegram api error: {0}")]
    Api(String),
}
