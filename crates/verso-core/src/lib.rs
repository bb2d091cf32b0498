//! verso-core - Core library for Verso
//!
//! This crate provides the migration record, the validator, command and
//! selection logic, the migration file format, migration sources, and
//! configuration parsing shared by all Verso components.

pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod migration;
pub mod plan;
pub mod scaffold;
pub mod source;
pub mod validate;
pub mod version;

pub use command::{Command, Direction};
pub use config::Config;
pub use error::{CoreError, CoreResult, ValidationError};
pub use migration::Migration;
pub use plan::{plan, Plan};
pub use source::{DirectorySource, MigrationSource, StaticSource};
pub use validate::validate_migrations;
pub use version::Version;
