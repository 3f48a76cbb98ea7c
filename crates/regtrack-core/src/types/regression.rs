//! Persisted representation of one tracked regression.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RegressedTestSummary, TestStats, VariantSet};

/// Point-in-time statistics captured when a regression is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionStats {
    pub sample: TestStats,
    pub basis: TestStats,
    pub sample_pass_rate: f64,
    pub basis_pass_rate: f64,
}

impl RegressionStats {
    pub fn from_summary(summary: &RegressedTestSummary) -> Self {
        Self {
            sample: summary.sample_stats,
            basis: summary.basis_stats,
            sample_pass_rate: summary.sample_stats.pass_rate(),
            basis_pass_rate: summary.basis_stats.pass_rate(),
        }
    }
}

/// A row in the `test_regressions` ledger.
///
/// Records are never deleted. The only mutation is the `closed` transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRecord {
    /// Generated at open time; the only key used for reopen/close.
    pub regression_id: String,
    pub release: String,
    pub test_id: String,
    /// Denormalized label, may go stale after an upstream rename.
    pub test_name: String,
    pub variants: VariantSet,
    pub opened: DateTime<Utc>,
    /// `None` while open.
    pub closed: Option<DateTime<Utc>>,
    pub stats: Option<RegressionStats>,
}

impl RegressionRecord {
    /// Build a fresh open record for a newly detected regression.
    pub fn new_open(
        regression_id: String,
        release: &str,
        summary: &RegressedTestSummary,
        opened: DateTime<Utc>,
    ) -> Self {
        Self {
            regression_id,
            release: release.to_string(),
            test_id: summary.test_id.clone(),
            test_name: summary.test_name.clone(),
            variants: summary.variants.clone(),
            opened,
            closed: None,
            stats: Some(RegressionStats::from_summary(summary)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed.is_none()
    }
}
