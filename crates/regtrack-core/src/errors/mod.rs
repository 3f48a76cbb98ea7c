//! Error types for the regression tracker (thiserror).

pub mod config_error;
pub mod error_code;
pub mod recovery;
pub mod store_error;
pub mod tracker_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use recovery::RecoveryAction;
pub use store_error::StoreError;
pub use tracker_error::{TrackerError, TrackerResult};
