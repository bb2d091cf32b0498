//! Ordering and selection of migrations for a command
//!
//! Given the full migration set, the ledger's current version, and a command,
//! [`plan`] returns the migrations to execute in execution order:
//!
//! - `up` - every version above current, ascending
//! - `up-to N` - versions above current and at most `N`, ascending
//! - `up-one` - the first version above current
//! - `down` - the migration carrying the current version
//! - `down-to N` - versions from current down to and including `N`, descending
//! - `reset` - every version at or below current, descending

use crate::command::{Command, Direction};
use crate::migration::Migration;
use crate::version::Version;

/// Ordered selection of migrations for one invocation.
#[derive(Debug, Clone)]
pub struct Plan<'a> {
    /// Command the plan was computed for
    pub command: Command,

    /// Ledger version the plan starts from
    pub from: Version,

    /// Migrations to execute, in execution order
    pub steps: Vec<&'a Migration>,
}

impl Plan<'_> {
    /// Direction of every step in the plan.
    pub fn direction(&self) -> Direction {
        self.command.direction()
    }

    /// Returns `true` when there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Versions of the steps, in execution order.
    pub fn versions(&self) -> Vec<Version> {
        self.steps.iter().map(|m| m.version).collect()
    }
}

/// Compute the ordered subset of `migrations` that `command` executes when the
/// ledger stands at `current`.
///
/// Versions are expected to be unique (see
/// [`validate_migrations`](crate::validate::validate_migrations)), so sorting by
/// version is a strict total order.
pub fn plan(command: Command, migrations: &[Migration], current: Version) -> Plan<'_> {
    let mut ascending: Vec<&Migration> = migrations.iter().collect();
    ascending.sort_by_key(|m| m.version);

    let steps: Vec<&Migration> = match command {
        Command::Up => ascending.into_iter().filter(|m| m.version > current).collect(),
        Command::UpTo(target) => ascending
            .into_iter()
            .filter(|m| m.version <= target && m.version > current)
            .collect(),
        Command::UpOne => ascending
            .into_iter()
            .find(|m| m.version > current)
            .into_iter()
            .collect(),
        Command::Down => {
            if current.is_none() {
                Vec::new()
            } else {
                ascending
                    .into_iter()
                    .find(|m| m.version == current)
                    .into_iter()
                    .collect()
            }
        }
        Command::Reset => ascending
            .into_iter()
            .rev()
            .filter(|m| m.version <= current)
            .collect(),
        Command::DownTo(target) => ascending
            .into_iter()
            .rev()
            .filter(|m| m.version >= target && m.version <= current)
            .collect(),
    };

    Plan {
        command,
        from: current,
        steps,
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
