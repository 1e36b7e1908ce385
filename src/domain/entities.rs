//! Domain entities representing core business concepts

use serde::{Deserialize, Serialize};

use super::value_objects::Severity;

/// A repository visible to the configured GitHub token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The `owner/name` form used throughout reports and logs.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// One open Dependabot security alert, normalized from the API payload.
///
/// Every field is already defaulted: construction cannot fail no matter
/// which parts of the source record were missing. Values are never
/// mutated after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAlert {
    /// `owner/name` of the repository the alert was found in.
    pub repo_name: String,
    /// Affected package, `"unknown"` when the source omits it.
    pub package_name: String,
    pub severity: Severity,
    /// Empty when the advisory has no CVE assigned.
    pub cve_id: String,
    /// Empty when the advisory has no GHSA id.
    pub ghsa_id: String,
    pub summary: String,
    /// Vulnerable version range, may be empty.
    pub vulnerable_version: String,
    /// First patched version, `"N/A"` when no fix is published yet.
    pub patched_version: String,
    /// Link to the alert on GitHub, may be empty.
    pub url: String,
    /// ISO-8601 creation timestamp, may be empty.
    pub created_at: String,
}

impl SecurityAlert {
    /// Preferred public identifier: CVE, falling back to the GHSA id,
    /// falling back to `"N/A"`.
    pub fn identifier(&self) -> &str {
        if !self.cve_id.is_empty() {
            &self.cve_id
        } else if !self.ghsa_id.is_empty() {
            &self.ghsa_id
        } else {
            "N/A"
        }
    }
}

/// Alerts grouped into the four report buckets.
///
/// All four buckets always exist; `Unknown` severities are filed under
/// `low`. Order within a bucket is discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertBuckets {
    pub critical: Vec<SecurityAlert>,
    pub high: Vec<SecurityAlert>,
    pub moderate: Vec<SecurityAlert>,
    pub low: Vec<SecurityAlert>,
}

impl AlertBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// File an alert under its severity bucket.
    pub fn push(&mut self, alert: SecurityAlert) {
        match alert.severity {
            Severity::Critical => self.critical.push(alert),
            Severity::High => self.high.push(alert),
            Severity::Moderate => self.moderate.push(alert),
            Severity::Low | Severity::Unknown => self.low.push(alert),
        }
    }

    /// The bucket a given severity is reported under.
    pub fn bucket(&self, severity: Severity) -> &[SecurityAlert] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Moderate => &self.moderate,
            Severity::Low | Severity::Unknown => &self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.moderate.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Buckets in report priority order, paired with their severity.
    pub fn sections(&self) -> impl Iterator<Item = (Severity, &[SecurityAlert])> + '_ {
        Severity::report_order()
            .into_iter()
            .map(move |severity| (severity, self.bucket(severity)))
    }
}

/// A chat recipient registered to receive reports.
///
/// Created once on first successful activation and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub chat_id: i64,
    pub username: Option<String>,
    /// RFC 3339 timestamp stamped at registration time.
    pub activated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(severity: Severity) -> SecurityAlert {
        SecurityAlert {
            repo_name: "acme/api".to_string(),
            package_name: "lodash".to_string(),
            severity,
            cve_id: String::new(),
            ghsa_id: String::new(),
            summary: "Prototype pollution".to_string(),
            vulnerable_version: "< 4.17.21".to_string(),
            patched_version: "4.17.21".to_string(),
            url: String::new(),
            created_at: String::new(),
        }
    }

    #[test]
    fn identifier_prefers_cve_then_ghsa() {
        let mut a = alert(Severity::High);
        assert_eq!(a.identifier(), "N/A");

        a.ghsa_id = "GHSA-p6mc-m468-83gw".to_string();
        assert_eq!(a.identifier(), "GHSA-p6mc-m468-83gw");

        a.cve_id = "CVE-2020-8203".to_string();
        assert_eq!(a.identifier(), "CVE-2020-8203");
    }

    #[test]
    fn unknown_severity_is_filed_under_low() {
        let mut buckets = AlertBuckets::new();
        buckets.push(alert(Severity::Unknown));
        assert_eq!(buckets.low.len(), 1);
        assert!(buckets.critical.is_empty());
    }

    #[test]
    fn total_counts_all_buckets() {
        let mut buckets = AlertBuckets::new();
        buckets.push(alert(Severity::Critical));
        buckets.push(alert(Severity::High));
        buckets.push(alert(Severity::Moderate));
        buckets.push(alert(Severity::Low));
        buckets.push(alert(Severity::Unknown));
        assert_eq!(buckets.total(), 5);
        assert!(!buckets.is_empty());
    }

    #[test]
    fn sections_are_in_priority_order() {
        let buckets = AlertBuckets::new();
        let order: Vec<Severity> = buckets.sections().map(|(s, _)| s).collect();
        assert_eq!(
            order,
            vec![
                Severity::Critical,
                Severity::High,
                Severity::Moderate,
                Severity::Low
            ]
        );
    }
}
