//! test_regressions / test_regression_variants queries.

use chrono::{DateTime, Utc};
use regtrack_core::errors::StoreError;
use regtrack_core::types::{RegressionRecord, RegressionStats, TestStats, VariantPair, VariantSet};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::to_store_err;

const SELECT_COLUMNS: &str = "regression_id, release, test_id, test_name, opened, closed,
    sample_success_count, sample_failure_count, sample_flake_count, sample_pass_rate,
    basis_success_count, basis_failure_count, basis_flake_count, basis_pass_rate";

/// A raw ledger row, before timestamp decoding and variant reassembly.
#[derive(Debug, Clone)]
pub struct RegressionRow {
    pub regression_id: String,
    pub release: String,
    pub test_id: String,
    pub test_name: String,
    pub opened: i64,
    pub closed: Option<i64>,
    pub sample: Option<(u32, u32, u32, f64)>,
    pub basis: Option<(u32, u32, u32, f64)>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RegressionRow> {
    let sample_success: Option<u32> = row.get(6)?;
    let basis_success: Option<u32> = row.get(10)?;
    let sample = match sample_success {
        Some(success) => Some((
            success,
            row.get::<_, Option<u32>>(7)?.unwrap_or(0),
            row.get::<_, Option<u32>>(8)?.unwrap_or(0),
            row.get::<_, Option<f64>>(9)?.unwrap_or(0.0),
        )),
        None => None,
    };
    let basis = match basis_success {
        Some(success) => Some((
            success,
            row.get::<_, Option<u32>>(11)?.unwrap_or(0),
            row.get::<_, Option<u32>>(12)?.unwrap_or(0),
            row.get::<_, Option<f64>>(13)?.unwrap_or(0.0),
        )),
        None => None,
    };
    Ok(RegressionRow {
        regression_id: row.get(0)?,
        release: row.get(1)?,
        test_id: row.get(2)?,
        test_name: row.get(3)?,
        opened: row.get(4)?,
        closed: row.get(5)?,
        sample,
        basis,
    })
}

/// Milliseconds since the epoch, the on-disk timestamp format.
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub fn from_millis(column: &str, ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| StoreError::DecodeFailed {
        column: column.to_string(),
        message: format!("timestamp out of range: {}", ms),
    })
}

/// Drop sub-millisecond precision so in-memory values equal what is stored.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> Result<DateTime<Utc>, StoreError> {
    from_millis("opened", to_millis(ts))
}

fn decode(row: RegressionRow, variants: VariantSet) -> Result<RegressionRecord, StoreError> {
    let stats = match (row.sample, row.basis) {
        (Some(s), Some(b)) => Some(RegressionStats {
            sample: TestStats::new(s.0, s.1, s.2),
            basis: TestStats::new(b.0, b.1, b.2),
            sample_pass_rate: s.3,
            basis_pass_rate: b.3,
        }),
        _ => None,
    };
    Ok(RegressionRecord {
        opened: from_millis("opened", row.opened)?,
        closed: row.closed.map(|ms| from_millis("closed", ms)).transpose()?,
        regression_id: row.regression_id,
        release: row.release,
        test_id: row.test_id,
        test_name: row.test_name,
        variants,
        stats,
    })
}

fn load_variants(conn: &Connection, regression_id: &str) -> Result<VariantSet, StoreError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT variant_key, variant_value FROM test_regression_variants
             WHERE regression_id = ?1 ORDER BY variant_key",
        )
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map(params![regression_id], |row| {
            Ok(VariantPair {
                key: row.get(0)?,
                value: row.get(1)?,
            })
        })
        .map_err(to_store_err)?;

    let mut pairs = Vec::new();
    for row in rows {
        pairs.push(row.map_err(to_store_err)?);
    }
    Ok(VariantSet::from_pairs(pairs))
}

/// Insert a record and its variant rows in one transaction.
pub fn insert_regression(conn: &Connection, record: &RegressionRecord) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction().map_err(to_store_err)?;
    let stats = record.stats.as_ref();
    tx.execute(
        "INSERT INTO test_regressions
         (regression_id, release, test_id, test_name, opened, closed,
          sample_success_count, sample_failure_count, sample_flake_count, sample_pass_rate,
          basis_success_count, basis_failure_count, basis_flake_count, basis_pass_rate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            record.regression_id,
            record.release,
            record.test_id,
            record.test_name,
            to_millis(record.opened),
            record.closed.map(to_millis),
            stats.map(|s| s.sample.success_count),
            stats.map(|s| s.sample.failure_count),
            stats.map(|s| s.sample.flake_count),
            stats.map(|s| s.sample_pass_rate),
            stats.map(|s| s.basis.success_count),
            stats.map(|s| s.basis.failure_count),
            stats.map(|s| s.basis.flake_count),
            stats.map(|s| s.basis_pass_rate),
        ],
    )
    .map_err(to_store_err)?;

    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO test_regression_variants (regression_id, variant_key, variant_value)
                 VALUES (?1, ?2, ?3)",
            )
            .map_err(to_store_err)?;
        for pair in record.variants.to_pairs() {
            stmt.execute(params![record.regression_id, pair.key, pair.value])
                .map_err(to_store_err)?;
        }
    }

    tx.commit().map_err(to_store_err)
}

/// Open records for `release`, plus those closed strictly after `closed_after_ms`.
pub fn list_current(
    conn: &Connection,
    release: &str,
    closed_after_ms: i64,
) -> Result<Vec<RegressionRecord>, StoreError> {
    let sql = format!(
        "SELECT {} FROM test_regressions
         WHERE release = ?1 AND (closed IS NULL OR closed > ?2)
         ORDER BY opened, regression_id",
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(to_store_err)?;
    let rows = stmt
        .query_map(params![release, closed_after_ms], read_row)
        .map_err(to_store_err)?;

    let mut raw = Vec::new();
    for row in rows {
        raw.push(row.map_err(to_store_err)?);
    }

    let mut records = Vec::with_capacity(raw.len());
    for row in raw {
        let variants = load_variants(conn, &row.regression_id)?;
        records.push(decode(row, variants)?);
    }
    Ok(records)
}

/// Fetch one record by ID regardless of state.
pub fn get_regression(
    conn: &Connection,
    regression_id: &str,
) -> Result<Option<RegressionRecord>, StoreError> {
    let sql = format!(
        "SELECT {} FROM test_regressions WHERE regression_id = ?1",
        SELECT_COLUMNS
    );
    let row = conn
        .query_row(&sql, params![regression_id], read_row)
        .optional()
        .map_err(to_store_err)?;
    match row {
        Some(row) => {
            let variants = load_variants(conn, &row.regression_id)?;
            Ok(Some(decode(row, variants)?))
        }
        None => Ok(None),
    }
}

/// Set or clear `closed`. Errors with `NotFound` when no row has the ID.
pub fn set_closed(
    conn: &Connection,
    regression_id: &str,
    closed_ms: Option<i64>,
) -> Result<(), StoreError> {
    let changed = conn
        .execute(
            "UPDATE test_regressions SET closed = ?1 WHERE regression_id = ?2",
            params![closed_ms, regression_id],
        )
        .map_err(to_store_err)?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            regression_id: regression_id.to_string(),
        });
    }
    Ok(())
}

/// Count every record for a release, open or closed.
pub fn count_regressions(conn: &Connection, release: &str) -> Result<u64, StoreError> {
    conn.query_row(
        "SELECT COUNT(*) FROM test_regressions WHERE release = ?1",
        params![release],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(to_store_err)
}
