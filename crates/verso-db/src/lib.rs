//! verso-db - Database abstraction layer for Verso
//!
//! This crate provides the statement, transaction, and version ledger traits
//! the migration engine runs against, and their DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, DatabaseCore, DatabaseTransaction, Ledger, LedgerEntry};
