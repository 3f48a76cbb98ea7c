//! `SqliteRegressionStore`: the production `RegressionStore`.
//!
//! Each trait method delegates to a free function in `queries::regressions`,
//! routed through the pool: reads via `with_reader`, writes via `with_writer`.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use regtrack_core::config::{StorageConfig, TrackerConfig};
use regtrack_core::errors::StoreError;
use regtrack_core::traits::{grace_cutoff, RegressionStore, DEFAULT_GRACE_WINDOW_HOURS};
use regtrack_core::types::{RegressedTestSummary, RegressionRecord};
use rusqlite::Connection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::regressions;

pub struct SqliteRegressionStore {
    pool: ConnectionPool,
    grace_window: Duration,
}

impl SqliteRegressionStore {
    /// Open a file-backed ledger and run migrations.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable {
                    reason: format!("failed to create ledger directory: {}", e),
                })?;
            }
        }
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        Self::initialize(pool)
    }

    /// Open an in-memory ledger (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let pool = ConnectionPool::open_in_memory(StorageConfig::default().busy_timeout_ms)?;
        Self::initialize(pool)
    }

    /// Open whatever `[storage]` points at, with the `[tracker]` grace window.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, StoreError> {
        let store = match &config.storage.db_path {
            Some(path) => Self::open(Path::new(path), &config.storage)?,
            None => {
                let pool = ConnectionPool::open_in_memory(config.storage.busy_timeout_ms)?;
                Self::initialize(pool)?
            }
        };
        Ok(store.with_grace_window(config.tracker.grace_window()))
    }

    fn initialize(pool: ConnectionPool) -> Result<Self, StoreError> {
        pool.with_writer(|conn| migrations::migrate(conn).map(|_| ()))?;
        Ok(Self {
            pool,
            grace_window: Duration::hours(DEFAULT_GRACE_WINDOW_HOURS),
        })
    }

    pub fn with_grace_window(mut self, grace_window: Duration) -> Self {
        self.grace_window = grace_window;
        self
    }

    pub fn grace_window(&self) -> Duration {
        self.grace_window
    }

    /// Fetch one record by ID regardless of state or age.
    pub fn get(&self, regression_id: &str) -> Result<Option<RegressionRecord>, StoreError> {
        self.pool
            .with_reader(|conn| regressions::get_regression(conn, regression_id))
    }

    /// Every record for a release, open or closed.
    pub fn count(&self, release: &str) -> Result<u64, StoreError> {
        self.pool
            .with_reader(|conn| regressions::count_regressions(conn, release))
    }

    /// Insert a record exactly as given. Used for imports and test fixtures.
    pub fn insert(&self, record: &RegressionRecord) -> Result<(), StoreError> {
        self.pool
            .with_writer(|conn| regressions::insert_regression(conn, record))
    }

    /// Raw write access for operations not covered by the trait.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        self.pool.with_writer(f)
    }
}

impl RegressionStore for SqliteRegressionStore {
    fn list_current(&self, release: &str) -> Result<Vec<RegressionRecord>, StoreError> {
        let cutoff = grace_cutoff(Utc::now(), self.grace_window);
        info!(
            release,
            closed_after = %cutoff,
            "fetching current test regressions"
        );
        self.pool.with_reader(|conn| {
            regressions::list_current(conn, release, regressions::to_millis(cutoff))
        })
    }

    fn open(
        &self,
        release: &str,
        summary: &RegressedTestSummary,
    ) -> Result<RegressionRecord, StoreError> {
        let opened = regressions::truncate_to_millis(Utc::now())?;
        let record =
            RegressionRecord::new_open(Uuid::new_v4().to_string(), release, summary, opened);
        self.pool
            .with_writer(|conn| regressions::insert_regression(conn, &record))?;
        debug!(regression_id = %record.regression_id, test_id = %record.test_id, "inserted regression");
        Ok(record)
    }

    fn reopen(&self, regression_id: &str) -> Result<(), StoreError> {
        self.pool
            .with_writer(|conn| regressions::set_closed(conn, regression_id, None))?;
        debug!(regression_id, "cleared closed timestamp");
        Ok(())
    }

    fn close(&self, regression_id: &str, closed_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.pool.with_writer(|conn| {
            regressions::set_closed(conn, regression_id, Some(regressions::to_millis(closed_at)))
        })?;
        debug!(regression_id, closed_at = %closed_at, "set closed timestamp");
        Ok(())
    }
}
