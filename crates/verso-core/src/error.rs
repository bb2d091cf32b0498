//! Error types for verso-core

use crate::version::Version;
use thiserror::Error;

/// Structural problems in a migration set, detected before execution.
///
/// Each variant names the offending version so the failing record can be
/// located without re-running validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// V001: Version is zero or does not fit the ledger
    #[error(
        "[V001] Migration version must be between 1 and {} (got {version})",
        Version::MAX
    )]
    InvalidVersion { version: Version },

    /// V002: Blank `up` body
    #[error("[V002] Migration {version} has no up statement")]
    MissingUp { version: Version },

    /// V003: Blank `down` body
    #[error("[V003] Migration {version} has no down statement")]
    MissingDown { version: Version },

    /// V004: Two records share a version
    #[error("[V004] Duplicate migration version {version}")]
    DuplicateVersion { version: Version },
}

/// Core error type for Verso
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Migrations directory not found
    #[error("[E003] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E004: Migration file name has no usable version prefix
    #[error("[E004] Cannot read version from migration file {path}: {reason}")]
    InvalidFileName { path: String, reason: String },

    /// E005: Unknown command name
    #[error("[E005] Unknown migration command '{name}'. Valid commands: {valid}")]
    UnknownCommand { name: String, valid: String },

    /// E006: Command requires a target version
    #[error("[E006] Command '{command}' requires a target version")]
    MissingTarget { command: String },

    /// E007: Invalid name for a new migration
    #[error("[E007] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E008: Command does not take a target version
    #[error("[E008] Command '{command}' does not take a target version (got {target})")]
    UnexpectedTarget { command: String, target: Version },

    /// E009: No version left after the highest existing one
    #[error("[E009] Cannot create a migration after version {latest}: versions are exhausted")]
    VersionsExhausted { latest: Version },

    /// Migration set failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error with file path context
    #[error("IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
