//! GitHub Dependabot alerts API client implementation

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::traits::{AlertSourceClient, RawAlert};
use crate::application::errors::AlertSourceError;
use crate::domain::RepositoryRef;

const PER_PAGE: u32 = 100;

/// Repository object from `GET /user/repos`, reduced to what the scan
/// needs.
#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    owner: RawOwner,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

/// Client for the GitHub REST API, scoped to repository listing and
/// Dependabot alert retrieval.
pub struct DependabotAlertClient {
    octo: Octocrab,
}

impl DependabotAlertClient {
    pub fn new(octo: Octocrab) -> Self {
        Self { octo }
    }

    /// Build a client from a personal access token. `base_url` overrides
    /// the API host, which tests use to point at a mock server.
    pub fn from_token(
        token: String,
        base_url: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, AlertSourceError> {
        let mut builder = Octocrab::builder()
            .set_connect_timeout(Some(Duration::from_secs(timeout_seconds)))
            .set_read_timeout(Some(Duration::from_secs(timeout_seconds)));
        if let Some(url) = &base_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| AlertSourceError::Transport(e.to_string()))?;
        }
        if !token.trim().is_empty() {
            builder = builder.personal_token(token);
        }
        let octo = builder
            .build()
            .map_err(|e| AlertSourceError::Transport(e.to_string()))?;
        Ok(Self { octo })
    }

    async fn try_fetch_open_alerts(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<RawAlert>, octocrab::Error> {
        let mut alerts = Vec::new();
        let mut page = 1u32;

        loop {
            let batch: Vec<RawAlert> = self
                .octo
                .get(
                    format!("/repos/{}/{}/dependabot/alerts", owner, repo),
                    Some(&[
                        ("state", "open".to_string()),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ]),
                )
                .await?;

            if batch.is_empty() {
                break;
            }
            alerts.extend(batch);
            page += 1;
        }

        Ok(alerts)
    }
}

/// A 403 means Dependabot alerts are disabled for the repository, a 404
/// means the token cannot see them. Both are expected on a subset of
/// repositories (forks, archived repos) and degrade to zero alerts.
fn is_feature_unavailable(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            matches!(source.status_code.as_u16(), 403 | 404)
        }
        _ => false,
    }
}

#[async_trait]
impl AlertSourceClient for DependabotAlertClient {
    #[instrument(skip(self))]
    async fn list_repositories(&self) -> Result<Vec<RepositoryRef>, AlertSourceError> {
        let mut repositories = Vec::new();
        let mut page = 1u32;

        loop {
            let batch: Vec<RawRepository> = self
                .octo
                .get(
                    "/user/repos",
                    Some(&[
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                        // owner, collaborator and organization_member repos
                        ("type", "all".to_string()),
                    ]),
                )
                .await
                .map_err(|e| AlertSourceError::Transport(e.to_string()))?;

            if batch.is_empty() {
                break;
            }
            repositories.extend(
                batch
                    .into_iter()
                    .map(|r| RepositoryRef::new(r.owner.login, r.name)),
            );
            page += 1;
        }

        debug!(count = repositories.len(), "listed repositories");
        Ok(repositories)
    }

    #[instrument(skip(self))]
    async fn fetch_open_alerts(&self, owner: &str, repo: &str) -> Vec<RawAlert> {
        match self.try_fetch_open_alerts(owner, repo).await {
            Ok(alerts) => alerts,
            Err(err) if is_feature_unavailable(&err) => {
                debug!(owner, repo, "dependabot alerts disabled or inaccessible");
                Vec::new()
            }
            Err(err) => {
                warn!(owner, repo, error = %err, "alert fetch failed, treating as empty");
                Vec::new()
            }
        }
    }
}
