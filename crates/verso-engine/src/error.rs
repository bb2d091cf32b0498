//! Error types for verso-engine

use std::time::Duration;
use thiserror::Error;
use verso_core::{CoreError, Direction, ValidationError, Version};
use verso_db::DbError;

fn at_version(version: &Option<Version>) -> String {
    match version {
        Some(v) => format!(" at version {v}"),
        None => String::new(),
    }
}

/// Migration engine errors.
///
/// Every variant except [`InvalidCommand`](EngineError::InvalidCommand) leaves
/// the database as it was before the invocation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The migration set failed validation; nothing was executed (M001)
    #[error("[M001] Invalid migration set: {0}")]
    Validation(#[from] ValidationError),

    /// A migration statement failed (M002)
    #[error("[M002] Migration {version} failed while running {direction}")]
    Execution {
        version: Version,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// Reading or writing the version ledger failed (M003)
    #[error("[M003] Ledger {operation} failed{}", at_version(.version))]
    Ledger {
        operation: &'static str,
        version: Option<Version>,
        #[source]
        source: DbError,
    },

    /// Beginning or committing the transaction failed (M004)
    #[error("[M004] Transaction {operation} failed")]
    Transaction {
        operation: &'static str,
        #[source]
        source: DbError,
    },

    /// The cancellation token fired (M005)
    #[error("[M005] Migration cancelled{}", at_version(.version))]
    Cancelled { version: Option<Version> },

    /// The invocation deadline passed (M006)
    #[error("[M006] Migration timed out after {timeout:?}{}", at_version(.version))]
    TimedOut {
        timeout: Duration,
        version: Option<Version>,
    },

    /// The caller passed a command the engine does not know (M007)
    #[error("[M007] Invalid command")]
    InvalidCommand(#[source] CoreError),
}

impl EngineError {
    /// Returns `true` for caller contract violations.
    ///
    /// Fatal errors mean the caller is wrong, not the data or the database;
    /// retrying the same call cannot succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::InvalidCommand(_))
    }

    /// Version being processed when the error occurred, if any.
    pub fn version(&self) -> Option<Version> {
        match self {
            EngineError::Execution { version, .. } => Some(*version),
            EngineError::Ledger { version, .. }
            | EngineError::Cancelled { version }
            | EngineError::TimedOut { version, .. } => *version,
            EngineError::Validation(err) => Some(match err {
                ValidationError::InvalidVersion { version }
                | ValidationError::MissingUp { version }
                | ValidationError::MissingDown { version }
                | ValidationError::DuplicateVersion { version } => *version,
            }),
            EngineError::Transaction { .. } | EngineError::InvalidCommand(_) => None,
        }
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
