//! Vulnwatch - Telegram bot entry point

use std::sync::Arc;

use vulnwatch::{
    Config,
    application::{AlertScanServiceImpl, ReportServiceImpl},
    infrastructure::{
        api_clients::DependabotAlertClient, chat::TelegramClient, registry::FileRegistry,
        repositories::ScanningAlertRepository,
    },
    init_tracing,
    presentation::BotDispatcher,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|_| {
        eprintln!("Failed to load configuration, using defaults");
        Config::default()
    });

    // Initialize tracing
    init_tracing(&config.logging)?;

    config.validate()?;

    tracing::info!("Starting vulnwatch bot...");

    // Alert pipeline
    let github_client = Arc::new(DependabotAlertClient::from_token(
        config.github.token.clone(),
        Some(config.github.base_url.clone()),
        config.github.timeout_seconds,
    )?);
    let alert_repository = Arc::new(ScanningAlertRepository::new(github_client));
    let scan_service = Arc::new(AlertScanServiceImpl::new(alert_repository));
    let report_service = Arc::new(ReportServiceImpl::new());

    // Delivery and registration
    let registry = Arc::new(FileRegistry::new(config.registry.path.clone()));
    let telegram = Arc::new(TelegramClient::new(
        config.telegram.bot_token.clone(),
        config.telegram.api_url.clone(),
        config.telegram.poll_timeout_seconds,
    ));

    let dispatcher = BotDispatcher::new(
        telegram,
        registry,
        scan_service,
        report_service,
        config.activation.token.clone(),
    );

    tokio::select! {
        _ = dispatcher.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping bot");
        }
    }

    Ok(())
}
