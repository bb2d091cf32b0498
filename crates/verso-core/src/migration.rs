//! Migration record

use crate::version::Version;
use serde::{Deserialize, Serialize};

/// One versioned schema change: a forward `up` body and the `down` body that
/// reverts it.
///
/// Records are plain values. They are built by a
/// [`MigrationSource`](crate::source::MigrationSource) for each invocation and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    /// Ordering and identity key
    pub version: Version,

    /// Descriptive label, usually taken from the file name
    #[serde(default)]
    pub name: Option<String>,

    /// Statement batch that advances the schema
    pub up: String,

    /// Statement batch that reverts `up`
    pub down: String,
}

impl Migration {
    /// Create an unnamed migration.
    pub fn new(version: u64, up: impl Into<String>, down: impl Into<String>) -> Self {
        Self {
            version: Version::new(version),
            name: None,
            up: up.into(),
            down: down.into(),
        }
    }

    /// Attach a descriptive name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label used in log lines and status output, e.g. `3 (add_orders)`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} ({})", self.version, name),
            _ => self.version.to_string(),
        }
    }
}
