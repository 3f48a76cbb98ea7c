//! Reconciliation pass configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::traits::{DEFAULT_GRACE_WINDOW_HOURS, MAX_GRACE_WINDOW_HOURS};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub dry_run: bool,
    /// How long a closed regression can still be reopened.
    pub grace_window_hours: i64,
    /// Whole-pass bound. 0 = unbounded.
    pub pass_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            grace_window_hours: DEFAULT_GRACE_WINDOW_HOURS,
            pass_timeout_secs: 0,
        }
    }
}

impl SyncConfig {
    /// Clamped to `MAX_GRACE_WINDOW_HOURS`; `validate` rejects anything larger.
    pub fn grace_window(&self) -> chrono::Duration {
        let hours = self.grace_window_hours.clamp(0, MAX_GRACE_WINDOW_HOURS);
        chrono::Duration::try_hours(hours).unwrap_or(chrono::Duration::MAX)
    }

    pub fn pass_timeout(&self) -> Option<Duration> {
        (self.pass_timeout_secs > 0).then(|| Duration::from_secs(self.pass_timeout_secs))
    }
}
