//! Outcome types returned by the migrator

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use verso_core::{Command, Direction, Version};

/// One migration executed by an invocation.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Version of the executed migration
    pub version: Version,
    /// Descriptive name of the migration, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Time spent on the statement batch and its ledger update
    #[serde(serialize_with = "serialize_millis", rename = "duration_ms")]
    pub duration: Duration,
}

/// Result of a committed invocation.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// Command that was run
    #[serde(serialize_with = "serialize_display")]
    pub command: Command,
    /// Whether `up` or `down` bodies were executed
    pub direction: Direction,
    /// Ledger version before the invocation
    pub from: Version,
    /// Ledger version after the invocation
    pub to: Version,
    /// Executed migrations, in execution order
    pub steps: Vec<StepReport>,
}

impl MigrationReport {
    /// Versions executed, in execution order.
    pub fn versions(&self) -> Vec<Version> {
        self.steps.iter().map(|s| s.version).collect()
    }

    /// Returns `true` if nothing was executed.
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }
}

/// State of one version relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    /// Present in the set and recorded in the ledger
    Applied,
    /// Present in the set, not recorded, above the current version
    Pending,
    /// Present in the set, not recorded, below the current version. `up`
    /// never applies these.
    Skipped,
    /// Recorded in the ledger but absent from the set
    Missing,
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MigrationState::Applied => "applied",
            MigrationState::Pending => "pending",
            MigrationState::Skipped => "skipped",
            MigrationState::Missing => "missing",
        };
        write!(f, "{s}")
    }
}

/// One row of [`MigrationStatus`].
#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    /// Migration or ledger version
    pub version: Version,
    /// Descriptive name; `None` for missing migrations
    pub name: Option<String>,
    /// Where the version stands relative to the ledger
    pub state: MigrationState,
    /// When the version was applied, if it is in the ledger
    pub applied_at: Option<DateTime<Utc>>,
}

/// The migration set compared with the ledger, ordered by version.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    /// Highest applied version
    pub current: Version,
    /// One entry per version in the set or the ledger
    pub entries: Vec<StatusEntry>,
}

impl MigrationStatus {
    /// Number of entries in `state`.
    pub fn count(&self, state: MigrationState) -> usize {
        self.entries.iter().filter(|e| e.state == state).count()
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

fn serialize_display<S: serde::Serializer>(
    value: &Command,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}
