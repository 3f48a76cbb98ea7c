//! `SqliteRegressionStore` against real SQLite files.
//!
//! File-backed temp directories so the writer and the read pool share one
//! database.

use chrono::{Duration, Utc};
use regtrack_core::config::StorageConfig;
use regtrack_core::errors::StoreError;
use regtrack_core::traits::RegressionStore;
use regtrack_core::types::{RegressedTestSummary, RegressionRecord, TestStats, VariantSet};
use regtrack_core::TrackerConfig;
use regtrack_storage::SqliteRegressionStore;
use tempfile::TempDir;

fn temp_store() -> (TempDir, SqliteRegressionStore) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("ledger.db");
    let store = SqliteRegressionStore::open(&db_path, &StorageConfig::default()).unwrap();
    (dir, store)
}

fn variants() -> VariantSet {
    VariantSet::new()
        .with("Network", "ovn")
        .with("Upgrade", "none")
        .with("Arch", "amd64")
        .with("Platform", "aws")
}

fn summary(test_id: &str) -> RegressedTestSummary {
    RegressedTestSummary {
        test_id: test_id.to_string(),
        test_name: format!("[sig-test] {test_id}"),
        component: "Networking".to_string(),
        capability: "Services".to_string(),
        variants: variants(),
        sample_stats: TestStats::new(70, 25, 5),
        basis_stats: TestStats::new(190, 8, 2),
    }
}

fn closed_record(id: &str, test_id: &str, closed_hours_ago: i64) -> RegressionRecord {
    let now = Utc::now();
    let mut record =
        RegressionRecord::new_open(id.to_string(), "4.16", &summary(test_id), now - Duration::days(10));
    record.closed = Some(now - Duration::hours(closed_hours_ago));
    record
}

#[test]
fn open_persists_full_record() {
    let (_dir, store) = temp_store();

    let opened = store.open("4.16", &summary("t-1")).unwrap();
    assert!(opened.is_open());
    assert!(!opened.regression_id.is_empty());

    let fetched = store.get(&opened.regression_id).unwrap().unwrap();
    assert_eq!(fetched, opened);
    assert_eq!(fetched.variants, variants());

    let stats = fetched.stats.unwrap();
    assert_eq!(stats.sample, TestStats::new(70, 25, 5));
    assert_eq!(stats.basis, TestStats::new(190, 8, 2));
    assert!((stats.sample_pass_rate - 0.75).abs() < f64::EPSILON);
}

#[test]
fn open_generates_distinct_ids() {
    let (_dir, store) = temp_store();
    let a = store.open("4.16", &summary("t-1")).unwrap();
    let b = store.open("4.16", &summary("t-1")).unwrap();
    assert_ne!(a.regression_id, b.regression_id);
    assert_eq!(store.count("4.16").unwrap(), 2);
}

#[test]
fn list_current_is_scoped_to_release() {
    let (_dir, store) = temp_store();
    store.open("4.16", &summary("t-1")).unwrap();
    store.open("4.15", &summary("t-2")).unwrap();

    let current = store.list_current("4.16").unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].test_id, "t-1");
    assert!(store.list_current("4.17").unwrap().is_empty());
}

#[test]
fn list_current_honors_grace_window() {
    let (_dir, store) = temp_store();
    store.insert(&closed_record("recent", "t-1", 2)).unwrap();
    store.insert(&closed_record("stale", "t-2", 72)).unwrap();
    let open = store.open("4.16", &summary("t-3")).unwrap();

    let mut ids: Vec<String> = store
        .list_current("4.16")
        .unwrap()
        .into_iter()
        .map(|r| r.regression_id)
        .collect();
    ids.sort();
    let mut expected = vec!["recent".to_string(), open.regression_id];
    expected.sort();
    assert_eq!(ids, expected);

    // Stale records are still in the ledger, just not current.
    assert_eq!(store.count("4.16").unwrap(), 3);
    assert!(store.get("stale").unwrap().is_some());
}

#[test]
fn custom_grace_window_is_applied() {
    let (_dir, store) = temp_store();
    let store = store.with_grace_window(Duration::hours(1));
    store.insert(&closed_record("recent", "t-1", 2)).unwrap();
    assert!(store.list_current("4.16").unwrap().is_empty());
}

#[test]
fn oversized_grace_window_lists_all_closed_records() {
    let (_dir, store) = temp_store();
    let store = store.with_grace_window(Duration::MAX);
    store.insert(&closed_record("ancient", "t-1", 24 * 3650)).unwrap();
    let current = store.list_current("4.16").unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].regression_id, "ancient");
}

#[test]
fn stats_at_u32_max_persist() {
    let (_dir, store) = temp_store();
    let mut huge = summary("t-1");
    huge.sample_stats = TestStats::new(u32::MAX, 1, 0);
    let opened = store.open("4.16", &huge).unwrap();
    let fetched = store.get(&opened.regression_id).unwrap().unwrap();
    assert_eq!(fetched.stats.unwrap().sample, TestStats::new(u32::MAX, 1, 0));
}

#[test]
fn close_then_reopen_keeps_identity() {
    let (_dir, store) = temp_store();
    let opened = store.open("4.16", &summary("t-1")).unwrap();

    let closed_at = Utc::now();
    store.close(&opened.regression_id, closed_at).unwrap();
    let closed = store.get(&opened.regression_id).unwrap().unwrap();
    assert_eq!(
        closed.closed.map(|c| c.timestamp_millis()),
        Some(closed_at.timestamp_millis())
    );
    // Closed within the grace window, still current.
    assert_eq!(store.list_current("4.16").unwrap().len(), 1);

    store.reopen(&opened.regression_id).unwrap();
    let reopened = store.get(&opened.regression_id).unwrap().unwrap();
    assert!(reopened.is_open());
    assert_eq!(reopened.opened, opened.opened);
    assert_eq!(reopened.regression_id, opened.regression_id);
}

#[test]
fn reopen_of_open_record_is_noop() {
    let (_dir, store) = temp_store();
    let opened = store.open("4.16", &summary("t-1")).unwrap();
    store.reopen(&opened.regression_id).unwrap();
    assert_eq!(store.get(&opened.regression_id).unwrap().unwrap(), opened);
}

#[test]
fn unknown_id_is_not_found() {
    let (_dir, store) = temp_store();
    assert!(matches!(
        store.close("missing", Utc::now()),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.reopen("missing"),
        Err(StoreError::NotFound { .. })
    ));
    assert!(store.get("missing").unwrap().is_none());
}

#[test]
fn empty_variant_set_round_trips() {
    let (_dir, store) = temp_store();
    let mut bare = summary("t-1");
    bare.variants = VariantSet::new();
    let opened = store.open("4.16", &bare).unwrap();
    let fetched = store.get(&opened.regression_id).unwrap().unwrap();
    assert!(fetched.variants.is_empty());
}

#[test]
fn ledger_survives_reopen_of_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("ledger.db");

    let id = {
        let store = SqliteRegressionStore::open(&db_path, &StorageConfig::default()).unwrap();
        store.open("4.16", &summary("t-1")).unwrap().regression_id
    };

    let store = SqliteRegressionStore::open(&db_path, &StorageConfig::default()).unwrap();
    let current = store.list_current("4.16").unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].regression_id, id);
}

#[test]
fn from_config_uses_tracker_grace_window() {
    let dir = TempDir::new().unwrap();
    let toml = format!(
        "[storage]\ndb_path = {:?}\n\n[tracker]\ngrace_window_hours = 6\n",
        dir.path().join("ledger.db").display().to_string()
    );
    let config = TrackerConfig::from_toml(&toml).unwrap();
    let store = SqliteRegressionStore::from_config(&config).unwrap();
    assert_eq!(store.grace_window(), Duration::hours(6));

    let in_memory = SqliteRegressionStore::from_config(&TrackerConfig::default()).unwrap();
    assert_eq!(in_memory.grace_window(), Duration::hours(48));
    assert_eq!(in_memory.count("4.16").unwrap(), 0);
}
