//! Application services orchestrating the alert pipeline

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::application::errors::{AlertSourceError, ApplicationError};
use crate::domain::{AlertBuckets, Severity, SeverityAggregator};
use crate::infrastructure::chat::ChatTransport;
use crate::infrastructure::registry::RecipientRegistry;
use crate::infrastructure::repositories::AlertRepository;

/// At most this many alerts are rendered per severity section; the rest
/// are collapsed into a single "and N more" line.
const MAX_ALERTS_PER_SECTION: usize = 10;

/// Service producing the bucketed alert overview for all repositories.
///
/// This is the single entry point both the `/update` command and the
/// scheduled job call.
#[async_trait]
pub trait AlertScanService: Send + Sync {
    async fn aggregate_all(&self) -> Result<AlertBuckets, AlertSourceError>;
}

pub struct AlertScanServiceImpl {
    repository: Arc<dyn AlertRepository>,
    aggregator: SeverityAggregator,
}

impl AlertScanServiceImpl {
    pub fn new(repository: Arc<dyn AlertRepository>) -> Self {
        Self {
            repository,
            aggregator: SeverityAggregator::new(),
        }
    }
}

#[async_trait]
impl AlertScanService for AlertScanServiceImpl {
    async fn aggregate_all(&self) -> Result<AlertBuckets, AlertSourceError> {
        let alerts = self.repository.collect_open_alerts().await?;
        info!(total = alerts.len(), "collected open alerts");
        Ok(self.aggregator.bucket(alerts))
    }
}

/// Service rendering alert buckets into the chat report text.
pub trait ReportService: Send + Sync {
    /// Render the report. Deterministic: identical buckets always yield
    /// byte-identical output.
    fn render_text(&self, buckets: &AlertBuckets) -> String;
}

pub struct ReportServiceImpl;

impl ReportServiceImpl {
    pub fn new() -> Self {
        Self
    }

    fn severity_emoji(severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => "🔴",
            Severity::High => "🟠",
            Severity::Moderate => "🟡",
            Severity::Low => "🔵",
            Severity::Unknown => "⚪",
        }
    }
}

impl Default for ReportServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportService for ReportServiceImpl {
    fn render_text(&self, buckets: &AlertBuckets) -> String {
        let total = buckets.total();

        if total == 0 {
            return "✅ *Security Monitor Report*\n\nНет открытых уязвимостей! Все репозитории в безопасности."
                .to_string();
        }

        let mut lines = vec![
            "🛡️ *Security Monitor Report*".to_string(),
            format!("📅 Найдено уязвимостей: *{}*", total),
            String::new(),
        ];

        for (severity, alerts) in buckets.sections() {
            if alerts.is_empty() {
                continue;
            }

            lines.push(format!(
                "\n{} *{}* ({})",
                Self::severity_emoji(severity),
                severity.label().to_ascii_uppercase(),
                alerts.len()
            ));
            lines.push("─".repeat(25));

            for alert in alerts.iter().take(MAX_ALERTS_PER_SECTION) {
                lines.push(format!("📦 `{}`", alert.package_name));
                lines.push(format!("   📁 {}", alert.repo_name));
                lines.push(format!("   🆔 {}", alert.identifier()));
                lines.push(format!("   ⬆️ Обновить до: {}", alert.patched_version));
                if !alert.url.is_empty() {
                    lines.push(format!("   🔗 [Подробнее]({})", alert.url));
                }
                lines.push(String::new());
            }

            if alerts.len() > MAX_ALERTS_PER_SECTION {
                lines.push(format!(
                    "   ... и ещё {}",
                    alerts.len() - MAX_ALERTS_PER_SECTION
                ));
            }
        }

        lines.push(
            "\n💡 *Рекомендация:* Обновите зависимости командой `npm update` или `pip install --upgrade`"
                .to_string(),
        );

        lines.join("\n")
    }
}

/// The scheduled broadcast: scan once, render once, deliver to every
/// registered recipient with per-recipient failure isolation.
pub struct DailyReportJob {
    registry: Arc<dyn RecipientRegistry>,
    scanner: Arc<dyn AlertScanService>,
    reporter: Arc<dyn ReportService>,
    transport: Arc<dyn ChatTransport>,
}

impl DailyReportJob {
    pub fn new(
        registry: Arc<dyn RecipientRegistry>,
        scanner: Arc<dyn AlertScanService>,
        reporter: Arc<dyn ReportService>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            registry,
            scanner,
            reporter,
            transport,
        }
    }

    pub async fn run(&self) -> Result<(), ApplicationError> {
        let chat_ids = self.registry.all_ids().await?;

        if chat_ids.is_empty() {
            info!("no activated recipients, skipping report");
            return Ok(());
        }

        info!(recipients = chat_ids.len(), "sending daily report");

        let buckets = self.scanner.aggregate_all().await?;
        info!(total = buckets.total(), "aggregated open alerts");
        let report = self.reporter.render_text(&buckets);

        for chat_id in chat_ids {
            match self.transport.send_message(chat_id, &report).await {
                Ok(()) => info!(chat_id, "report delivered"),
                Err(e) => error!(chat_id, error = %e, "failed to deliver report"),
            }
        }

        Ok(())
    }
}
