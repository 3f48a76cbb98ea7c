pub mod allowances_config;
pub mod storage_config;
pub mod sync_config;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use allowances_config::AllowancesConfig;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;

use crate::allowances::RegressionAllowances;
use crate::errors::ConfigError;
use crate::traits::MAX_GRACE_WINDOW_HOURS;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub tracker: SyncConfig,
    pub allowances: AllowancesConfig,
}

impl TrackerConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.grace_window_hours <= 0 {
            return Err(ConfigError::Invalid(format!(
                "tracker.grace_window_hours must be positive, got {}",
                self.tracker.grace_window_hours
            )));
        }
        if self.tracker.grace_window_hours > MAX_GRACE_WINDOW_HOURS {
            return Err(ConfigError::Invalid(format!(
                "tracker.grace_window_hours must be at most {}, got {}",
                MAX_GRACE_WINDOW_HOURS, self.tracker.grace_window_hours
            )));
        }
        if self.storage.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "storage.busy_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the allowances file once. No path configured means no allowances.
    pub fn load_allowances(&self) -> Result<Arc<RegressionAllowances>, ConfigError> {
        match &self.allowances.path {
            Some(path) => Ok(Arc::new(RegressionAllowances::load(Path::new(path))?)),
            None => Ok(Arc::new(RegressionAllowances::empty())),
        }
    }
}
