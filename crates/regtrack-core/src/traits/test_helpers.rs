//! `InMemoryRegressionStore`: in-memory test double for `RegressionStore`.
//!
//! Records every call so tests can assert on what reached the store, and
//! supports per-operation failure injection.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::store::{grace_cutoff, RegressionStore, DEFAULT_GRACE_WINDOW_HOURS};
use crate::errors::StoreError;
use crate::types::{RegressedTestSummary, RegressionRecord};

/// Store operation, used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListCurrent,
    Open,
    Reopen,
    Close,
}

/// One call that reached the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    ListCurrent { release: String },
    Open { release: String, test_id: String },
    Reopen { regression_id: String },
    Close { regression_id: String, closed_at: DateTime<Utc> },
}

impl StoreCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListCurrent { .. })
    }
}

pub struct InMemoryRegressionStore {
    records: Mutex<Vec<RegressionRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<HashMap<StoreOp, StoreError>>,
    grace_window: Duration,
}

impl InMemoryRegressionStore {
    pub fn new() -> Self {
        Self::with_grace_window(Duration::hours(DEFAULT_GRACE_WINDOW_HOURS))
    }

    pub fn with_grace_window(grace_window: Duration) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            grace_window,
        }
    }

    /// Insert an existing record as-is, bypassing `open`.
    pub fn seed(&self, record: RegressionRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Every record ever stored, open or closed, in insertion order.
    pub fn records(&self) -> Vec<RegressionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn get(&self, regression_id: &str) -> Option<RegressionRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.regression_id == regression_id)
            .cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(StoreCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make every subsequent call of `op` fail with `error`.
    pub fn fail_on(&self, op: StoreOp, error: StoreError) {
        self.failures.lock().unwrap().insert(op, error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    fn record_call(&self, op: StoreOp, call: StoreCall) -> Result<(), StoreError> {
        self.calls
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .push(call);
        let failures = self
            .failures
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        match failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn set_closed(
        &self,
        regression_id: &str,
        closed: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let record = records
            .iter_mut()
            .find(|r| r.regression_id == regression_id)
            .ok_or_else(|| StoreError::NotFound {
                regression_id: regression_id.to_string(),
            })?;
        record.closed = closed;
        Ok(())
    }
}

impl Default for InMemoryRegressionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionStore for InMemoryRegressionStore {
    fn list_current(&self, release: &str) -> Result<Vec<RegressionRecord>, StoreError> {
        self.record_call(
            StoreOp::ListCurrent,
            StoreCall::ListCurrent {
                release: release.to_string(),
            },
        )?;
        let cutoff = grace_cutoff(Utc::now(), self.grace_window);
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records
            .iter()
            .filter(|r| r.release == release)
            .filter(|r| r.closed.map_or(true, |closed| closed > cutoff))
            .cloned()
            .collect())
    }

    fn open(
        &self,
        release: &str,
        summary: &RegressedTestSummary,
    ) -> Result<RegressionRecord, StoreError> {
        self.record_call(
            StoreOp::Open,
            StoreCall::Open {
                release: release.to_string(),
                test_id: summary.test_id.clone(),
            },
        )?;
        let record =
            RegressionRecord::new_open(Uuid::new_v4().to_string(), release, summary, Utc::now());
        self.records
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .push(record.clone());
        Ok(record)
    }

    fn reopen(&self, regression_id: &str) -> Result<(), StoreError> {
        self.record_call(
            StoreOp::Reopen,
            StoreCall::Reopen {
                regression_id: regression_id.to_string(),
            },
        )?;
        self.set_closed(regression_id, None)
    }

    fn close(&self, regression_id: &str, closed_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.record_call(
            StoreOp::Close,
            StoreCall::Close {
                regression_id: regression_id.to_string(),
                closed_at,
            },
        )?;
        self.set_closed(regression_id, Some(closed_at))
    }
}
