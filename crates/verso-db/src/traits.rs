//! Database trait definitions
//!
//! The migration engine talks to the database through three narrow traits:
//! statement execution, transaction control, and the version ledger. Every
//! method runs on the same connection, so ledger reads and writes join the
//! transaction opened with [`DatabaseTransaction::begin`].

use crate::error::DbResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use verso_core::Version;

/// Statement execution.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute one or more SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Explicit transaction control.
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;
}

/// One applied version as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Applied version
    pub version: Version,
    /// When the version was applied
    pub applied_at: DateTime<Utc>,
}

/// Persisted record of applied versions.
///
/// Implementations create the ledger table on first use.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Highest applied version, or [`Version::NONE`] when nothing is applied
    async fn current_version(&self) -> DbResult<Version>;

    /// Append an entry for `version`
    async fn record_applied(&self, version: Version) -> DbResult<()>;

    /// Remove the entry for `version`
    async fn record_reverted(&self, version: Version) -> DbResult<()>;

    /// All entries, ascending by version
    async fn applied_versions(&self) -> DbResult<Vec<LedgerEntry>>;
}

/// Everything the migration engine needs from a backend.
pub trait Database: DatabaseCore + DatabaseTransaction + Ledger {}

impl<T> Database for T where T: DatabaseCore + DatabaseTransaction + Ledger {}
