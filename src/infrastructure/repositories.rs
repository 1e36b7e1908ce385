//! Repository implementations

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::api_clients::traits::{AlertSourceClient, RawAlert};
use crate::application::errors::AlertSourceError;
use crate::domain::{SecurityAlert, Severity};

/// Repository trait for collecting normalized alerts across all visible
/// repositories.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn collect_open_alerts(&self) -> Result<Vec<SecurityAlert>, AlertSourceError>;
}

/// Walks every repository the credential can see and normalizes its open
/// alerts, in discovery order.
pub struct ScanningAlertRepository {
    source: Arc<dyn AlertSourceClient>,
}

impl ScanningAlertRepository {
    pub fn new(source: Arc<dyn AlertSourceClient>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl AlertRepository for ScanningAlertRepository {
    async fn collect_open_alerts(&self) -> Result<Vec<SecurityAlert>, AlertSourceError> {
        let repositories = self.source.list_repositories().await?;

        let mut alerts = Vec::new();
        for repository in &repositories {
            let raw_alerts = self
                .source
                .fetch_open_alerts(&repository.owner, &repository.name)
                .await;
            if !raw_alerts.is_empty() {
                debug!(
                    repo = %repository.full_name(),
                    count = raw_alerts.len(),
                    "open alerts found"
                );
            }
            alerts.extend(
                raw_alerts
                    .into_iter()
                    .map(|raw| normalize_alert(&repository.owner, &repository.name, raw)),
            );
        }

        Ok(alerts)
    }
}

/// Map a raw API alert into the uniform internal record.
///
/// Total function: every missing or null level degrades to a documented
/// default instead of failing.
pub fn normalize_alert(owner: &str, repo: &str, raw: RawAlert) -> SecurityAlert {
    let advisory = raw.security_advisory.unwrap_or_default();
    let vulnerability = raw.security_vulnerability.unwrap_or_default();
    let package = vulnerability.package.unwrap_or_default();

    SecurityAlert {
        repo_name: format!("{}/{}", owner, repo),
        package_name: package.name.unwrap_or_else(|| "unknown".to_string()),
        severity: Severity::from_label(advisory.severity.as_deref().unwrap_or("")),
        cve_id: advisory.cve_id.unwrap_or_default(),
        ghsa_id: advisory.ghsa_id.unwrap_or_default(),
        summary: advisory
            .summary
            .unwrap_or_else(|| "No description".to_string()),
        vulnerable_version: vulnerability.vulnerable_version_range.unwrap_or_default(),
        patched_version: vulnerability
            .first_patched_version
            .and_then(|v| v.identifier)
            .unwrap_or_else(|| "N/A".to_string()),
        url: raw.html_url.unwrap_or_default(),
        created_at: raw.created_at.unwrap_or_default(),
    }
}
