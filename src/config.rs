//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub github: GithubConfig,
    pub activation: ActivationConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather.
    pub bot_token: String,
    pub api_url: String,
    /// Long-poll timeout passed to getUpdates, in seconds.
    pub poll_timeout_seconds: u64,
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token with `repo` scope for Dependabot alert access.
    pub token: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Shared activation token gating bot registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationConfig {
    pub token: String,
}

/// Recipient registry storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: String::new(),
                api_url: "https://api.telegram.org".to_string(),
                poll_timeout_seconds: 30,
            },
            github: GithubConfig {
                token: String::new(),
                base_url: "https://api.github.com".to_string(),
                timeout_seconds: 30,
            },
            activation: ActivationConfig {
                token: String::new(),
            },
            registry: RegistryConfig {
                path: PathBuf::from("activated_users.json"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("VULNWATCH").separator("__"));

        // Override with environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder.build()?.try_deserialize()
    }

    /// Check that the secrets required at runtime are present.
    pub fn validate(&self) -> Result<(), String> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err("telegram.bot_token is not configured".to_string());
        }
        if self.github.token.trim().is_empty() {
            return Err("github.token is not configured".to_string());
        }
        if self.activation.token.trim().is_empty() {
            return Err("activation.token is not configured".to_string());
        }
        Ok(())
    }
}
