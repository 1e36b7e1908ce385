//! Domain value objects representing immutable concepts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity assigned to a security alert by the advisory source.
///
/// The four named levels are the only ones GitHub emits today; anything
/// else (including a missing severity field) maps to `Unknown` and is
/// filed under the `low` report bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Low,
    Unknown,
}

impl Severity {
    /// Parse a severity label case-insensitively. Unrecognized or empty
    /// labels become `Unknown` rather than an error.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "moderate" => Severity::Moderate,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    /// The lowercase bucket label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }

    /// Report sections in descending priority. `Unknown` is not a report
    /// bucket; those alerts are shown under `Low`.
    pub fn report_order() -> [Severity; 4] {
        [
            Severity::Critical,
            Severity::High,
            Severity::Moderate,
            Severity::Low,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}
