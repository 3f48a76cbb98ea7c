//! Outcome of one reconciliation pass.

use crate::types::VariantSet;

/// A decision the engine made. Recorded whether or not it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Open {
        test_id: String,
        test_name: String,
        variants: VariantSet,
    },
    Reopen {
        regression_id: String,
        test_id: String,
    },
    Close {
        regression_id: String,
        test_id: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub dry_run: bool,
    /// Records returned by `list_current` at the start of the pass.
    pub loaded: usize,
    pub opened: usize,
    pub reopened: usize,
    /// Report entries that resolved to an already-open record.
    pub matched: usize,
    pub closed: usize,
    /// Report entries without a test ID.
    pub skipped: usize,
    /// Report entries covered by an intentional regression allowance.
    pub allowed: usize,
    pub actions: Vec<SyncAction>,
}

impl SyncSummary {
    /// Number of open/reopen/close decisions, applied or not.
    pub fn mutations(&self) -> usize {
        self.opened + self.reopened + self.closed
    }
}
