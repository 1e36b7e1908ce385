//! Vulnwatch - GitHub Dependabot alert monitoring over Telegram
//!
//! This crate scans every repository visible to a GitHub token for open
//! Dependabot security alerts, groups them by severity and delivers a
//! Markdown report to registered Telegram chats, either on demand
//! (`/update`) or from a daily scheduled job.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use config::Config;
pub use logging::init_tracing;
