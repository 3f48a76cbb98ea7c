//! Configuration and allowance loading errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid allowance for test {test_id:?} in release {release}: {reason}")]
    InvalidAllowance {
        release: String,
        test_id: String,
        reason: String,
    },

    #[error("test {test_id:?} was already added for release {release}")]
    DuplicateAllowance { release: String, test_id: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAllowance { .. } | Self::DuplicateAllowance { .. } => {
                error_code::INVALID_ALLOWANCE
            }
            _ => error_code::CONFIG_ERROR,
        }
    }
}
