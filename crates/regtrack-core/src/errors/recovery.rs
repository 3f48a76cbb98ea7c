//! RecoveryAction enum: what the scheduler should do when a pass fails.

use std::fmt;

use super::{StoreError, TrackerError};

/// Recommended recovery action for a failed reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Re-run the whole pass on the next cycle (transient store failure, deadline).
    Retry,
    /// Escalate to an operator; re-running will fail the same way.
    Escalate,
}

impl RecoveryAction {
    /// Determine the recommended recovery action for a TrackerError.
    pub fn for_error(error: &TrackerError) -> Self {
        match error {
            TrackerError::DeadlineExceeded { .. } => Self::Retry,
            TrackerError::Config(_) => Self::Escalate,
            TrackerError::ListFailed { source, .. }
            | TrackerError::OpenFailed { source, .. }
            | TrackerError::ReopenFailed { source, .. }
            | TrackerError::CloseFailed { source, .. } => Self::for_store_error(source),
        }
    }

    fn for_store_error(error: &StoreError) -> Self {
        if error.is_transient() {
            return Self::Retry;
        }
        match error {
            // A record vanished between list and mutate; the next list will not see it.
            StoreError::NotFound { .. } => Self::Retry,
            _ => Self::Escalate,
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "Retry"),
            Self::Escalate => write!(f, "Escalate"),
        }
    }
}
