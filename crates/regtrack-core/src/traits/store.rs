//! `RegressionStore` trait: list/open/reopen/close against the regression ledger.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::errors::StoreError;
use crate::types::{RegressedTestSummary, RegressionRecord};

/// Recently closed records stay visible to the matcher for this long so a
/// flapping test resumes its old record instead of starting a new one.
pub const DEFAULT_GRACE_WINDOW_HOURS: i64 = 48;

/// Upper bound accepted from configuration (ten years).
pub const MAX_GRACE_WINDOW_HOURS: i64 = 24 * 365 * 10;

/// Earliest `closed` timestamp still inside the grace window. A window
/// reaching past the representable range keeps every closed record current.
pub fn grace_cutoff(now: DateTime<Utc>, grace_window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(grace_window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Persisted ledger of regression records, scoped per release.
///
/// Object-safe, `Send + Sync`, with a blanket `Arc<T>` impl.
pub trait RegressionStore: Send + Sync {
    /// Every record for `release` that is open or was closed within the grace window.
    fn list_current(&self, release: &str) -> Result<Vec<RegressionRecord>, StoreError>;

    /// Persist a new open record with a freshly generated regression ID.
    ///
    /// Does not check for an existing open record with the same identity;
    /// duplicate suppression is the caller's job.
    fn open(
        &self,
        release: &str,
        summary: &RegressedTestSummary,
    ) -> Result<RegressionRecord, StoreError>;

    /// Clear `closed`. Succeeds as a no-op when the record is already open.
    fn reopen(&self, regression_id: &str) -> Result<(), StoreError>;

    /// Set `closed = closed_at`.
    fn close(&self, regression_id: &str, closed_at: DateTime<Utc>) -> Result<(), StoreError>;
}

impl<T: RegressionStore + ?Sized> RegressionStore for Arc<T> {
    fn list_current(&self, release: &str) -> Result<Vec<RegressionRecord>, StoreError> {
        (**self).list_current(release)
    }
    fn open(
        &self,
        release: &str,
        summary: &RegressedTestSummary,
    ) -> Result<RegressionRecord, StoreError> {
        (**self).open(release, summary)
    }
    fn reopen(&self, regression_id: &str) -> Result<(), StoreError> {
        (**self).reopen(regression_id)
    }
    fn close(&self, regression_id: &str, closed_at: DateTime<Utc>) -> Result<(), StoreError> {
        (**self).close(regression_id, closed_at)
    }
}
