//! DuckDB-backed block store
//!
//! Persists normalized records into a `blocks` table in a DuckDB database
//! file (or in-memory database). Each bulk insert runs inside a single
//! transaction, so a batch lands atomically; there is no transaction
//! across batches.

use super::BlockStore;
use crate::error::{Error, Result};
use crate::transform::{NormalizedBlock, TIMESTAMP_FORMAT};
use async_trait::async_trait;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS blocks (
    id VARCHAR NOT NULL,
    \"timestamp\" TIMESTAMP NOT NULL,
    height BIGINT NOT NULL,
    size BIGINT NOT NULL,
    difficulty BIGINT NOT NULL,
    bits BIGINT NOT NULL,
    transaction_count BIGINT NOT NULL,
    input_usd DOUBLE NOT NULL,
    output_usd DOUBLE NOT NULL,
    fee_usd DOUBLE NOT NULL,
    fee_per_kb_usd DOUBLE NOT NULL,
    reward_usd DOUBLE NOT NULL
);
";

const INSERT_SQL: &str =
    "INSERT INTO blocks VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Block store backed by a DuckDB database
pub struct DuckDbStore {
    // duckdb::Connection is Send but not Sync; inserts are short and
    // synchronous, so a plain mutex is enough.
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Open (or create) a database file and ensure the `blocks` table
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::store(format!("cannot open database: {e}")))?;
        Self::init(conn)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store(format!("cannot open in-memory database: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| Error::store(format!("cannot create blocks table: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of rows in the `blocks` table
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))
            .map_err(|e| Error::store(format!("count query failed: {e}")))?;
        Ok(count as usize)
    }

    /// Verify the store is reachable
    pub fn check(&self) -> Result<()> {
        let conn = self.lock()?;
        let _: i64 = conn
            .query_row("SELECT 1", [], |row| row.get(0))
            .map_err(|e| Error::store(format!("connection check failed: {e}")))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::store("connection lock poisoned"))
    }
}

#[async_trait]
impl BlockStore for DuckDbStore {
    async fn bulk_insert(&self, blocks: &[NormalizedBlock]) -> Result<()> {
        if blocks.is_empty() {
            return Ok(());
        }

        let conn = self.lock()?;
        conn.execute_batch("BEGIN")
            .map_err(|e| Error::store_write(format!("cannot begin transaction: {e}")))?;

        let insert_all = || -> Result<()> {
            let mut stmt = conn
                .prepare(INSERT_SQL)
                .map_err(|e| Error::store_write(format!("cannot prepare insert: {e}")))?;
            for block in blocks {
                stmt.execute(params![
                    block.id,
                    block.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    block.height,
                    block.size,
                    block.difficulty,
                    block.bits,
                    block.transaction_count,
                    block.input_usd,
                    block.output_usd,
                    block.fee_usd,
                    block.fee_per_kb_usd,
                    block.reward_usd,
                ])
                .map_err(|e| Error::store_write(format!("insert failed: {e}")))?;
            }
            Ok(())
        };

        if let Err(e) = insert_all() {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }

        conn.execute_batch("COMMIT")
            .map_err(|e| Error::store_write(format!("cannot commit batch: {e}")))?;

        debug!("Inserted {} blocks into DuckDB", blocks.len());
        Ok(())
    }
}

impl std::fmt::Debug for DuckDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbStore").finish_non_exhaustive()
    }
}
