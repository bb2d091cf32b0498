//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCore, DatabaseTransaction, Ledger, LedgerEntry};
use async_trait::async_trait;
use chrono::DateTime;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use verso_core::config::{is_valid_table_name, DEFAULT_LEDGER_TABLE};
use verso_core::Version;

/// DuckDB database backend
///
/// All calls share one connection, so the ledger methods run inside whatever
/// transaction is open on it.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    ledger_table: String,
}

impl DuckDbBackend {
    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Use `table` (optionally `schema.table`) as the ledger table.
    pub fn with_ledger_table(mut self, table: &str) -> DbResult<Self> {
        if !is_valid_table_name(table) {
            return Err(DbError::InvalidTableName(table.to_string()));
        }
        self.ledger_table = table.to_string();
        Ok(self)
    }

    /// Name of the ledger table
    pub fn ledger_table(&self) -> &str {
        &self.ledger_table
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Run a transaction control statement
    fn transaction_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{statement} failed: {e}")))
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }

    /// Create the ledger table (and its schema) if absent.
    fn ensure_ledger(&self, conn: &Connection) -> DbResult<()> {
        let mut sql = String::new();
        if let Some((schema, _)) = self.ledger_table.split_once('.') {
            sql.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {schema};\n"));
        }
        sql.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version    BIGINT    NOT NULL UNIQUE,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             );",
            self.ledger_table
        ));

        conn.execute_batch(&sql).map_err(|e| {
            DbError::LedgerError(format!(
                "failed to create ledger table {}: {e}",
                self.ledger_table
            ))
        })
    }

    fn current_version_sync(&self) -> DbResult<Version> {
        let conn = self.lock()?;
        self.ensure_ledger(&conn)?;

        let version: i64 = conn
            .query_row(
                &format!("SELECT COALESCE(MAX(version), 0) FROM {}", self.ledger_table),
                [],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(format!("failed to read current version: {e}")))?;
        version_from_db(version)
    }

    fn record_applied_sync(&self, version: Version) -> DbResult<()> {
        let conn = self.lock()?;
        self.ensure_ledger(&conn)?;

        conn.execute(
            &format!("INSERT INTO {} (version) VALUES (?)", self.ledger_table),
            duckdb::params![version_to_db(version)?],
        )
        .map_err(|e| DbError::LedgerError(format!("failed to record version {version}: {e}")))?;
        Ok(())
    }

    fn record_reverted_sync(&self, version: Version) -> DbResult<()> {
        let conn = self.lock()?;
        self.ensure_ledger(&conn)?;

        let removed = conn
            .execute(
                &format!("DELETE FROM {} WHERE version = ?", self.ledger_table),
                duckdb::params![version_to_db(version)?],
            )
            .map_err(|e| {
                DbError::LedgerError(format!("failed to remove version {version}: {e}"))
            })?;

        if removed == 0 {
            log::warn!(
                "Reverted version {version} had no entry in ledger table {}",
                self.ledger_table
            );
        }
        Ok(())
    }

    fn applied_versions_sync(&self) -> DbResult<Vec<LedgerEntry>> {
        let conn = self.lock()?;
        self.ensure_ledger(&conn)?;

        let map_err = |e: duckdb::Error| DbError::LedgerError(format!("failed to list versions: {e}"));

        let mut stmt = conn
            .prepare(&format!(
                "SELECT version, epoch_ms(applied_at) FROM {} ORDER BY version",
                self.ledger_table
            ))
            .map_err(map_err)?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))
            .map_err(map_err)?;

        let mut entries = Vec::new();
        for row in rows {
            let (version, applied_ms) = row.map_err(map_err)?;
            let applied_at = DateTime::from_timestamp_millis(applied_ms).ok_or_else(|| {
                DbError::LedgerError(format!(
                    "version {version} has an out-of-range timestamp ({applied_ms} ms)"
                ))
            })?;
            entries.push(LedgerEntry {
                version: version_from_db(version)?,
                applied_at,
            });
        }
        Ok(entries)
    }
}

fn version_to_db(version: Version) -> DbResult<i64> {
    i64::try_from(version.get()).map_err(|_| {
        DbError::LedgerError(format!("version {version} does not fit in a BIGINT column"))
    })
}

fn version_from_db(version: i64) -> DbResult<Version> {
    u64::try_from(version)
        .map(Version::new)
        .map_err(|_| DbError::LedgerError(format!("ledger holds negative version {version}")))
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseTransaction for DuckDbBackend {
    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }
}

#[async_trait]
impl Ledger for DuckDbBackend {
    async fn current_version(&self) -> DbResult<Version> {
        self.current_version_sync()
    }

    async fn record_applied(&self, version: Version) -> DbResult<()> {
        self.record_applied_sync(version)
    }

    async fn record_reverted(&self, version: Version) -> DbResult<()> {
        self.record_reverted_sync(version)
    }

    async fn applied_versions(&self) -> DbResult<Vec<LedgerEntry>> {
        self.applied_versions_sync()
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
