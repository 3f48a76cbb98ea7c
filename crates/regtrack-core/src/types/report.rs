//! Report input handed over by the statistical comparison engine.
//!
//! The tracker only reads these; pass rates and regression status are
//! computed upstream.

use serde::{Deserialize, Serialize};

use super::VariantSet;

/// Pass/fail/flake counts for one window (sample or basis).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestStats {
    pub success_count: u32,
    pub failure_count: u32,
    pub flake_count: u32,
}

impl TestStats {
    pub fn new(success_count: u32, failure_count: u32, flake_count: u32) -> Self {
        Self {
            success_count,
            failure_count,
            flake_count,
        }
    }

    /// Widened to `u64` so counts near `u32::MAX` cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.success_count) + u64::from(self.failure_count) + u64::from(self.flake_count)
    }

    /// Flakes count as passes. Returns 0.0 for an empty window.
    pub fn pass_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (u64::from(self.success_count) + u64::from(self.flake_count)) as f64 / total as f64
    }
}

/// One test the comparison judged as regressed for a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressedTestSummary {
    /// Stable identifier; survives renames and is the only name used for matching.
    pub test_id: String,
    /// Display only.
    pub test_name: String,
    pub component: String,
    pub capability: String,
    pub variants: VariantSet,
    pub sample_stats: TestStats,
    pub basis_stats: TestStats,
}

/// Human-attached note linking a regression to a known cause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentAnnotation {
    pub issue_url: String,
    pub description: String,
}

/// A regressed test that has been triaged. Still regressed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriagedIncident {
    pub summary: RegressedTestSummary,
    pub incidents: Vec<IncidentAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportColumn {
    pub variants: VariantSet,
    pub regressed_tests: Vec<RegressedTestSummary>,
    pub triaged_incidents: Vec<TriagedIncident>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRow {
    pub component: String,
    pub columns: Vec<ReportColumn>,
}

/// Grid of component rows × variant columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentReport {
    pub rows: Vec<ReportRow>,
}

impl ComponentReport {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every regressed test in the report, triaged or not, in row/column order.
    /// Triage does not mean fixed, so triaged entries stay in the set.
    pub fn all_regressed_tests(&self) -> Vec<&RegressedTestSummary> {
        let mut all = Vec::new();
        for row in &self.rows {
            for col in &row.columns {
                all.extend(col.regressed_tests.iter());
                all.extend(col.triaged_incidents.iter().map(|t| &t.summary));
            }
        }
        all
    }
}
