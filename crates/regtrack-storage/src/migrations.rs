//! Schema versioning using PRAGMA user_version.
//!
//! Each version bump is a const SQL string applied in order.

use regtrack_core::errors::StoreError;
use rusqlite::Connection;
use tracing::info;

use super::schema::REGRESSION_TABLES_V1;
use crate::to_store_err;

/// Current schema version. Bump this when adding new migrations.
pub const CURRENT_VERSION: u32 = 1;

pub fn current_version(conn: &Connection) -> Result<u32, StoreError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_store_err)
}

fn apply(conn: &Connection, version: u32, sql: &str) -> Result<(), StoreError> {
    let failed = |e: rusqlite::Error| StoreError::MigrationFailed {
        version,
        message: e.to_string(),
    };
    let tx = conn.unchecked_transaction().map_err(failed)?;
    tx.execute_batch(sql).map_err(failed)?;
    tx.pragma_update(None, "user_version", version).map_err(failed)?;
    tx.commit().map_err(failed)
}

/// Run all pending migrations. Returns the version the database ends at.
pub fn migrate(conn: &Connection) -> Result<u32, StoreError> {
    let current = current_version(conn)?;
    if current >= CURRENT_VERSION {
        return Ok(current);
    }

    if current < 1 {
        info!("Migrating regression ledger schema: 0 → 1 (initial tables)");
        apply(conn, 1, REGRESSION_TABLES_V1)?;
    }

    let final_version = current_version(conn)?;
    info!(from = current, to = final_version, "Regression ledger migration complete");
    Ok(final_version)
}
