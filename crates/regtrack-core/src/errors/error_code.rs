//! Stable string codes for every error surfaced to a scheduler or log pipeline.

pub const STORE_ERROR: &str = "STORE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";
pub const DECODE_FAILED: &str = "DECODE_FAILED";
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const LIST_FAILED: &str = "LIST_FAILED";
pub const OPEN_FAILED: &str = "OPEN_FAILED";
pub const REOPEN_FAILED: &str = "REOPEN_FAILED";
pub const CLOSE_FAILED: &str = "CLOSE_FAILED";
pub const DEADLINE_EXCEEDED: &str = "DEADLINE_EXCEEDED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_ALLOWANCE: &str = "INVALID_ALLOWANCE";

/// Every error type in the crate maps to one of the constants above.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}
