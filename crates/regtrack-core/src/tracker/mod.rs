//! Regression reconciliation: match the freshly computed report against the
//! ledger, then open, reopen and close records so the ledger converges.

pub mod deadline;
pub mod engine;
pub mod matcher;
pub mod summary;

pub use deadline::PassDeadline;
pub use engine::RegressionTracker;
pub use matcher::{find_open_regression, matches_regression};
pub use summary::{SyncAction, SyncSummary};
