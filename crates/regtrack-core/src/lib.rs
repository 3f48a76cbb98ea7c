//! # regtrack-core
//!
//! Foundation crate for test regression tracking.
//! Defines the data model, the `RegressionStore` contract, the matcher,
//! the reconciliation engine, regression allowances, errors, config and tracing.
//! The SQLite store in `regtrack-storage` depends on this.

pub mod allowances;
pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod tracker;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use allowances::{IntentionalRegression, RegressionAllowances};
pub use config::TrackerConfig;
pub use errors::{ConfigError, ErrorCode, RecoveryAction, StoreError, TrackerError, TrackerResult};
pub use traits::{InMemoryRegressionStore, RegressionStore};
pub use tracker::{find_open_regression, RegressionTracker, SyncAction, SyncSummary};
pub use types::{
    ComponentReport, RegressedTestSummary, RegressionRecord, RegressionStats, TestStats,
    VariantSet,
};
