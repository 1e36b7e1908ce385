//! Traits for alert source API clients

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::errors::AlertSourceError;
use crate::domain::RepositoryRef;

/// Raw Dependabot alert payload as returned by the REST API.
///
/// Every nesting level is optional: real responses routinely omit the
/// advisory, the vulnerability, the package or the patched version, and
/// normalization must not fail on any of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlert {
    #[serde(default)]
    pub security_advisory: Option<RawAdvisory>,
    #[serde(default)]
    pub security_vulnerability: Option<RawVulnerability>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdvisory {
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub cve_id: Option<String>,
    #[serde(default)]
    pub ghsa_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVulnerability {
    #[serde(default)]
    pub package: Option<RawPackage>,
    #[serde(default)]
    pub vulnerable_version_range: Option<String>,
    #[serde(default)]
    pub first_patched_version: Option<RawPatchedVersion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPackage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ecosystem: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPatchedVersion {
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Client for the vulnerability-alert source API.
#[async_trait]
pub trait AlertSourceClient: Send + Sync {
    /// List every repository visible to the credential (owned,
    /// collaborator and organization-member). Any transport failure here
    /// is fatal: a partial repository list is never used.
    async fn list_repositories(&self) -> Result<Vec<RepositoryRef>, AlertSourceError>;

    /// Fetch the open alerts for one repository.
    ///
    /// Soft-failure contract: a repository with the alert feature
    /// disabled or inaccessible (HTTP 403/404), or any other
    /// per-repository transport failure, yields an empty list. Failures
    /// are logged inside the client and never abort the scan.
    async fn fetch_open_alerts(&self, owner: &str, repo: &str) -> Vec<RawAlert>;
}
