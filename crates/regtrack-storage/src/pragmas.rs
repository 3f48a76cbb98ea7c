//! Per-connection PRAGMAs for the ledger. Applied by the pool right after
//! each connection opens, before any query runs.

use regtrack_core::errors::StoreError;
use rusqlite::Connection;

use crate::to_store_err;

/// WAL journal, NORMAL sync, foreign keys enforced for the variant rows.
/// `busy_timeout_ms` bounds how long any statement waits on a lock.
pub fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -4000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(to_store_err)?;
    conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms))
        .map_err(to_store_err)?;
    Ok(())
}

/// Same as `configure_connection` plus `query_only = ON`.
pub fn configure_readonly_connection(
    conn: &Connection,
    busy_timeout_ms: u64,
) -> Result<(), StoreError> {
    configure_connection(conn, busy_timeout_ms)?;
    conn.execute_batch("PRAGMA query_only = ON;")
        .map_err(to_store_err)?;
    Ok(())
}
