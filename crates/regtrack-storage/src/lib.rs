//! # regtrack-storage
//!
//! SQLite persistence for the test regression ledger.
//! WAL mode, one writer + a read pool, `PRAGMA user_version` migrations,
//! parameterized queries over `test_regressions` and its variant rows.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;
pub mod schema;

pub use engine::SqliteRegressionStore;
pub use pool::ConnectionPool;

use regtrack_core::errors::StoreError;

/// Map a rusqlite error onto the store error space. Lock contention and I/O
/// failures get their own variants so callers can retry them; everything
/// else is a hard `SqliteError`.
pub fn to_store_err(e: rusqlite::Error) -> StoreError {
    if is_busy_error(&e) {
        return StoreError::DbBusy;
    }
    if is_io_error(&e) {
        return StoreError::Unavailable {
            reason: e.to_string(),
        };
    }
    StoreError::SqliteError {
        message: e.to_string(),
    }
}

fn is_io_error(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::SystemIoFailure
                    | rusqlite::ffi::ErrorCode::CannotOpen
                    | rusqlite::ffi::ErrorCode::DiskFull,
                ..
            },
            _,
        )
    )
}

fn is_busy_error(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::DatabaseBusy
                    | rusqlite::ffi::ErrorCode::DatabaseLocked,
                ..
            },
            _,
        )
    )
}
