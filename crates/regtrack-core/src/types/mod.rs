//! Shared data structures: variant sets, report input, ledger records.

pub mod regression;
pub mod report;
pub mod variant;

pub use regression::{RegressionRecord, RegressionStats};
pub use report::{
    ComponentReport, IncidentAnnotation, RegressedTestSummary, ReportColumn, ReportRow,
    TestStats, TriagedIncident,
};
pub use variant::{VariantPair, VariantSet};
