//! Domain services containing business logic

use super::{AlertBuckets, SecurityAlert};

/// Service grouping normalized alerts into severity buckets.
pub struct SeverityAggregator;

impl SeverityAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Bucket alerts by severity, preserving discovery order within each
    /// bucket. Every input alert lands in exactly one bucket.
    pub fn bucket(&self, alerts: Vec<SecurityAlert>) -> AlertBuckets {
        let mut buckets = AlertBuckets::new();
        for alert in alerts {
            buckets.push(alert);
        }
        buckets
    }
}

impl Default for SeverityAggregator {
    fn default() -> Self {
        Self::new()
    }
}
