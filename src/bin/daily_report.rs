//! Vulnwatch - daily report job entry point
//!
//! Invoked by cron once a day; scans all repositories and broadcasts the
//! report to every registered chat.

use std::sync::Arc;

use vulnwatch::{
    Config,
    application::{AlertScanServiceImpl, DailyReportJob, ReportServiceImpl},
    infrastructure::{
        api_clients::DependabotAlertClient, chat::TelegramClient, registry::FileRegistry,
        repositories::ScanningAlertRepository,
    },
    init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load().unwrap_or_else(|_| {
        eprintln!("Failed to load configuration, using defaults");
        Config::default()
    });

    init_tracing(&config.logging)?;

    config.validate()?;

    let github_client = Arc::new(DependabotAlertClient::from_token(
        config.github.token.clone(),
        Some(config.github.base_url.clone()),
        config.github.timeout_seconds,
    )?);
    let alert_repository = Arc::new(ScanningAlertRepository::new(github_client));
    let scan_service = Arc::new(AlertScanServiceImpl::new(alert_repository));
    let report_service = Arc::new(ReportServiceImpl::new());
    let registry = Arc::new(FileRegistry::new(config.registry.path.clone()));
    let telegram = Arc::new(TelegramClient::new(
        config.telegram.bot_token.clone(),
        config.telegram.api_url.clone(),
        config.telegram.poll_timeout_seconds,
    ));

    let job = DailyReportJob::new(registry, scan_service, report_service, telegram);

    if let Err(e) = job.run().await {
        tracing::error!(error = %e, "daily report run failed");
        std::process::exit(1);
    }

    Ok(())
}
