//! `RegressionTracker`: one reconciliation pass per report cycle.
//!
//! Loads the current ledger records for a release, walks every regressed
//! test in the report (triaged or not), opens, reopens or leaves alone the
//! matching record, then closes whatever was not matched. The first store
//! failure aborts the pass; already applied mutations stay in place and the
//! next pass converges because matching is keyed by stable identity.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::deadline::PassDeadline;
use super::matcher::matches_regression;
use super::summary::{SyncAction, SyncSummary};
use crate::allowances::RegressionAllowances;
use crate::config::TrackerConfig;
use crate::errors::{ConfigError, TrackerError, TrackerResult};
use crate::traits::RegressionStore;
use crate::types::{ComponentReport, RegressedTestSummary, RegressionRecord};

/// The regression reconciliation engine.
///
/// Assumes it is the only writer for a release for the duration of a pass.
pub struct RegressionTracker {
    store: Arc<dyn RegressionStore>,
    dry_run: bool,
    allowances: Option<Arc<RegressionAllowances>>,
    pass_timeout: Option<Duration>,
}

impl RegressionTracker {
    /// With `dry_run` set, decisions are computed and logged but no
    /// open/reopen/close call reaches the store.
    pub fn new(store: Arc<dyn RegressionStore>, dry_run: bool) -> Self {
        Self {
            store,
            dry_run,
            allowances: None,
            pass_timeout: None,
        }
    }

    /// Build from `[tracker]` and `[allowances]`. Reads the allowances file
    /// once; an empty allowance set is not attached.
    pub fn from_config(
        store: Arc<dyn RegressionStore>,
        config: &TrackerConfig,
    ) -> Result<Self, ConfigError> {
        let mut tracker = Self::new(store, config.tracker.dry_run);
        let allowances = config.load_allowances()?;
        if !allowances.is_empty() {
            tracker = tracker.with_allowances(allowances);
        }
        if let Some(timeout) = config.tracker.pass_timeout() {
            tracker = tracker.with_pass_timeout(timeout);
        }
        Ok(tracker)
    }

    pub fn with_allowances(mut self, allowances: Arc<RegressionAllowances>) -> Self {
        self.allowances = Some(allowances);
        self
    }

    /// Bound the whole pass. Checked before every store call.
    pub fn with_pass_timeout(mut self, timeout: Duration) -> Self {
        self.pass_timeout = Some(timeout);
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn pass_timeout(&self) -> Option<Duration> {
        self.pass_timeout
    }

    pub fn has_allowances(&self) -> bool {
        self.allowances.is_some()
    }

    /// Reconcile the ledger for `release` against `report`.
    pub fn sync_component_report(
        &self,
        release: &str,
        report: &ComponentReport,
    ) -> TrackerResult<SyncSummary> {
        let deadline = PassDeadline::start(self.pass_timeout);

        deadline.check("list_current")?;
        let mut candidates = self.store.list_current(release).map_err(|source| {
            error!(release, error = %source, "error listing current regressions");
            TrackerError::ListFailed {
                release: release.to_string(),
                source,
            }
        })?;
        info!(
            release,
            dry_run = self.dry_run,
            loaded = candidates.len(),
            "loaded regressions from db"
        );

        let mut summary = SyncSummary {
            dry_run: self.dry_run,
            loaded: candidates.len(),
            ..Default::default()
        };
        // Keyed by regression ID, not record contents: two distinct records can
        // carry identical fields.
        let mut matched_ids: HashSet<String> = HashSet::new();

        for reg_test in report.all_regressed_tests() {
            if reg_test.test_id.is_empty() {
                warn!(
                    release,
                    test_name = %reg_test.test_name,
                    "skipping regressed test without a test ID"
                );
                summary.skipped += 1;
                continue;
            }
            self.note_allowance(release, reg_test, &mut summary);

            let found = candidates.iter().position(|record| {
                matches_regression(release, &reg_test.test_id, &reg_test.variants, record)
            });

            match found {
                Some(idx) if !candidates[idx].is_open() => {
                    self.reopen(&deadline, &mut candidates[idx], &mut summary)?;
                    matched_ids.insert(candidates[idx].regression_id.clone());
                }
                Some(idx) => {
                    debug!(
                        release,
                        regression_id = %candidates[idx].regression_id,
                        test_name = %reg_test.test_name,
                        "reusing already opened regression"
                    );
                    summary.matched += 1;
                    matched_ids.insert(candidates[idx].regression_id.clone());
                }
                None => {
                    let record = self.open(&deadline, release, reg_test, &mut summary)?;
                    matched_ids.insert(record.regression_id.clone());
                    // Later entries for the same identity match this record.
                    candidates.push(record);
                }
            }
        }

        let now = Utc::now();
        for regression in &candidates {
            if matched_ids.contains(&regression.regression_id) || !regression.is_open() {
                continue;
            }
            info!(
                release,
                dry_run = self.dry_run,
                regression_id = %regression.regression_id,
                test_id = %regression.test_id,
                variants = %regression.variants,
                "closing regression no longer appearing in the report"
            );
            summary.actions.push(SyncAction::Close {
                regression_id: regression.regression_id.clone(),
                test_id: regression.test_id.clone(),
            });
            if !self.dry_run {
                deadline.check("close")?;
                self.store
                    .close(&regression.regression_id, now)
                    .map_err(|source| {
                        error!(regression_id = %regression.regression_id, error = %source, "error closing regression");
                        TrackerError::CloseFailed {
                            regression_id: regression.regression_id.clone(),
                            source,
                        }
                    })?;
            }
            summary.closed += 1;
        }

        info!(
            release,
            dry_run = self.dry_run,
            opened = summary.opened,
            reopened = summary.reopened,
            matched = summary.matched,
            closed = summary.closed,
            skipped = summary.skipped,
            elapsed_ms = deadline.elapsed().as_millis() as u64,
            "regression sync complete"
        );
        Ok(summary)
    }

    /// Resume a recently closed record. Its ID and `opened` stay unchanged.
    fn reopen(
        &self,
        deadline: &PassDeadline,
        record: &mut RegressionRecord,
        summary: &mut SyncSummary,
    ) -> TrackerResult<()> {
        info!(
            dry_run = self.dry_run,
            regression_id = %record.regression_id,
            test_id = %record.test_id,
            variants = %record.variants,
            "re-opening recently closed regression"
        );
        summary.actions.push(SyncAction::Reopen {
            regression_id: record.regression_id.clone(),
            test_id: record.test_id.clone(),
        });
        if !self.dry_run {
            deadline.check("reopen")?;
            self.store.reopen(&record.regression_id).map_err(|source| {
                error!(regression_id = %record.regression_id, error = %source, "error re-opening regression");
                TrackerError::ReopenFailed {
                    regression_id: record.regression_id.clone(),
                    source,
                }
            })?;
        }
        record.closed = None;
        summary.reopened += 1;
        Ok(())
    }

    /// Open a brand-new record. In dry-run mode a placeholder record is
    /// returned so duplicates later in the same report still fold into it.
    fn open(
        &self,
        deadline: &PassDeadline,
        release: &str,
        reg_test: &RegressedTestSummary,
        summary: &mut SyncSummary,
    ) -> TrackerResult<RegressionRecord> {
        info!(
            release,
            dry_run = self.dry_run,
            test_id = %reg_test.test_id,
            test_name = %reg_test.test_name,
            variants = %reg_test.variants,
            "opening new regression"
        );
        summary.actions.push(SyncAction::Open {
            test_id: reg_test.test_id.clone(),
            test_name: reg_test.test_name.clone(),
            variants: reg_test.variants.clone(),
        });
        summary.opened += 1;

        if self.dry_run {
            let placeholder = format!("dry-run-{}", summary.opened);
            return Ok(RegressionRecord::new_open(
                placeholder,
                release,
                reg_test,
                Utc::now(),
            ));
        }

        deadline.check("open")?;
        let record = self.store.open(release, reg_test).map_err(|source| {
            error!(test_id = %reg_test.test_id, error = %source, "error opening new regression");
            TrackerError::OpenFailed {
                test_id: reg_test.test_id.clone(),
                test_name: reg_test.test_name.clone(),
                source,
            }
        })?;
        info!(regression_id = %record.regression_id, "new regression opened");
        Ok(record)
    }

    fn note_allowance(
        &self,
        release: &str,
        reg_test: &RegressedTestSummary,
        summary: &mut SyncSummary,
    ) {
        let Some(allowances) = &self.allowances else {
            return;
        };
        if let Some(allowed) =
            allowances.intentional_regression_for(release, &reg_test.variants, &reg_test.test_id)
        {
            info!(
                release,
                test_id = %reg_test.test_id,
                jira_component = %allowed.jira_component,
                reason = %allowed.reason_to_allow_instead_of_fix,
                "regressed test is an approved intentional regression"
            );
            summary.allowed += 1;
        }
    }
}
