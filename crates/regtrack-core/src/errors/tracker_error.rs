//! Errors surfaced by a reconciliation pass.

use std::time::Duration;

use super::error_code::{self, ErrorCode};
use super::{ConfigError, StoreError};

/// Failure of one `sync_component_report` pass. Every mutating failure
/// short-circuits the pass; mutations that already succeeded stay applied.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("error listing current regressions for release {release}: {source}")]
    ListFailed { release: String, source: StoreError },

    #[error("error opening new regression for test {test_id} ({test_name}): {source}")]
    OpenFailed {
        test_id: String,
        test_name: String,
        source: StoreError,
    },

    #[error("error re-opening regression {regression_id}: {source}")]
    ReopenFailed {
        regression_id: String,
        source: StoreError,
    },

    #[error("error closing regression {regression_id}: {source}")]
    CloseFailed {
        regression_id: String,
        source: StoreError,
    },

    #[error("deadline exceeded before {operation} after {elapsed:?}")]
    DeadlineExceeded {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl TrackerError {
    /// The underlying store error, when the failure came from the store.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::ListFailed { source, .. }
            | Self::OpenFailed { source, .. }
            | Self::ReopenFailed { source, .. }
            | Self::CloseFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ErrorCode for TrackerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ListFailed { .. } => error_code::LIST_FAILED,
            Self::OpenFailed { .. } => error_code::OPEN_FAILED,
            Self::ReopenFailed { .. } => error_code::REOPEN_FAILED,
            Self::CloseFailed { .. } => error_code::CLOSE_FAILED,
            Self::DeadlineExceeded { .. } => error_code::DEADLINE_EXCEEDED,
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Convenience type alias.
pub type TrackerResult<T> = Result<T, TrackerError>;
