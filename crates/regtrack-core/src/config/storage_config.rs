//! Ledger storage configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file. `None` runs against an in-memory database.
    pub db_path: Option<String>,
    /// Reader connections alongside the single writer.
    pub read_pool_size: usize,
    /// Upper bound on waiting for a lock, per statement.
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: 2,
            busy_timeout_ms: 5000,
        }
    }
}
