//! ConnectionPool: writer + read pool with round-robin selection.
//!
//! The only place in the storage crate that holds `Mutex<Connection>`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use regtrack_core::errors::StoreError;
use rusqlite::{Connection, OpenFlags};

use crate::pragmas;

/// Default number of reader connections.
const DEFAULT_READ_POOL_SIZE: usize = 2;

/// Connection pool for the ledger: 1 writer + N readers.
pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_index: AtomicUsize,
}

impl ConnectionPool {
    /// Open a file-backed pool with `read_pool_size` readers (0 = default).
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u64) -> Result<Self, StoreError> {
        let pool_size = if read_pool_size == 0 {
            DEFAULT_READ_POOL_SIZE
        } else {
            read_pool_size
        };

        let writer = Connection::open(path).map_err(|e| StoreError::Unavailable {
            reason: format!("failed to open ledger writer at {}: {}", path.display(), e),
        })?;
        pragmas::configure_connection(&writer, busy_timeout_ms)?;

        let mut readers = Vec::with_capacity(pool_size);
        for i in 0..pool_size {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| StoreError::Unavailable {
                reason: format!("failed to open ledger reader {}: {}", i, e),
            })?;
            pragmas::configure_readonly_connection(&reader, busy_timeout_ms)?;
            readers.push(Mutex::new(reader));
        }

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            read_index: AtomicUsize::new(0),
        })
    }

    /// Open an in-memory pool. Reads fall back to the single writer connection,
    /// since separate in-memory connections do not share a database.
    pub fn open_in_memory(busy_timeout_ms: u64) -> Result<Self, StoreError> {
        let writer = Connection::open_in_memory().map_err(|e| StoreError::Unavailable {
            reason: format!("failed to open in-memory ledger: {}", e),
        })?;
        pragmas::configure_connection(&writer, busy_timeout_ms)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            read_index: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with the writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::LockPoisoned(format!("writer: {}", e)))?;
        f(&conn)
    }

    /// Execute a closure with a reader connection (round-robin).
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }

        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index]
            .lock()
            .map_err(|e| StoreError::LockPoisoned(format!("reader {}: {}", index, e)))?;
        f(&conn)
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_reads_see_writes() {
        let pool = ConnectionPool::open_in_memory(5000).unwrap();
        pool.with_writer(|conn| {
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")
                .map_err(crate::to_store_err)
        })
        .unwrap();
        let x: i64 = pool
            .with_reader(|conn| {
                conn.query_row("SELECT x FROM t", [], |row| row.get(0))
                    .map_err(crate::to_store_err)
            })
            .unwrap();
        assert_eq!(x, 7);
        assert_eq!(pool.reader_count(), 0);
    }

    #[test]
    fn test_file_pool_round_robin_readers() {
        let dir = tempfile::TempDir::new().unwrap();
        let pool = ConnectionPool::open(&dir.path().join("ledger.db"), 3, 5000).unwrap();
        assert_eq!(pool.reader_count(), 3);
        for _ in 0..4 {
            let one: i64 = pool
                .with_reader(|conn| {
                    conn.query_row("SELECT 1", [], |row| row.get(0))
                        .map_err(crate::to_store_err)
                })
                .unwrap();
            assert_eq!(one, 1);
        }
    }
}
