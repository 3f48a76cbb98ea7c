//! Errors raised by `RegressionStore` implementations.

use super::error_code::{self, ErrorCode};

/// Errors that can occur reading or writing the regression ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    #[error("Regression not found: {regression_id}")]
    NotFound { regression_id: String },

    #[error("Failed to decode column {column}: {message}")]
    DecodeFailed { column: String, message: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    /// Lock contention and I/O unavailability clear up on the next cycle.
    /// Constraint, schema and decode failures repeat, so they are not transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DbBusy | Self::Unavailable { .. })
    }
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::NotFound { .. } => error_code::RECORD_NOT_FOUND,
            Self::DecodeFailed { .. } => error_code::DECODE_FAILED,
            Self::Unavailable { .. } => error_code::STORE_UNAVAILABLE,
            _ => error_code::STORE_ERROR,
        }
    }
}
