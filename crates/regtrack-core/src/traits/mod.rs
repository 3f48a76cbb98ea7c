//! The store contract between the reconciliation engine and the ledger.
//!
//! The SQLite implementation lives in `regtrack-storage`; the in-memory
//! implementation in `test_helpers` backs engine tests.

pub mod store;
pub mod test_helpers;

pub use store::{grace_cutoff, RegressionStore, DEFAULT_GRACE_WINDOW_HOURS, MAX_GRACE_WINDOW_HOURS};
pub use test_helpers::{InMemoryRegressionStore, StoreCall, StoreOp};
