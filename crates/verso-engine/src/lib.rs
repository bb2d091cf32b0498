//! verso-engine - Migration engine for Verso
//!
//! Validates a migration set, plans the work for a [`Command`](verso_core::Command),
//! and applies or reverts it atomically against a [`Database`](verso_db::Database).

pub mod error;
pub mod migrator;
pub mod report;

pub use error::{EngineError, EngineResult};
pub use migrator::Migrator;
pub use report::{MigrationReport, MigrationState, MigrationStatus, StatusEntry, StepReport};
