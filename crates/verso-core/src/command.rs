//! Migration commands

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use serde::Serialize;
use std::fmt;

/// Which body of a migration a command executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Execute `up` and append a ledger entry
    Up,
    /// Execute `down` and remove the ledger entry
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A migration command together with its target version, if it takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply every pending migration
    Up,
    /// Apply the next pending migration only
    UpOne,
    /// Apply pending migrations up to and including the target
    UpTo(Version),
    /// Revert the migration at the current version
    Down,
    /// Revert applied migrations down to and including the target
    DownTo(Version),
    /// Revert every applied migration
    Reset,
}

impl Command {
    /// Every recognised command name.
    pub const NAMES: [&'static str; 6] = ["up", "up-one", "up-to", "down", "down-to", "reset"];

    /// Build a command from its name and an optional target.
    ///
    /// `up-to` and `down-to` require a target and the other commands reject
    /// one. Unrecognised names and target mismatches are caller errors:
    /// [`CoreError::UnknownCommand`], [`CoreError::MissingTarget`] or
    /// [`CoreError::UnexpectedTarget`].
    pub fn from_parts(name: &str, target: Option<Version>) -> CoreResult<Self> {
        let require_target = || {
            target.ok_or_else(|| CoreError::MissingTarget {
                command: name.to_string(),
            })
        };
        let reject_target = |command: Command| match target {
            Some(target) => Err(CoreError::UnexpectedTarget {
                command: name.to_string(),
                target,
            }),
            None => Ok(command),
        };

        match name {
            "up" => reject_target(Command::Up),
            "up-one" => reject_target(Command::UpOne),
            "up-to" => Ok(Command::UpTo(require_target()?)),
            "down" => reject_target(Command::Down),
            "down-to" => Ok(Command::DownTo(require_target()?)),
            "reset" => reject_target(Command::Reset),
            other => Err(CoreError::UnknownCommand {
                name: other.to_string(),
                valid: Self::NAMES.join(", "),
            }),
        }
    }

    /// The command's name as accepted by [`from_parts`](Self::from_parts).
    pub fn name(&self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::UpOne => "up-one",
            Command::UpTo(_) => "up-to",
            Command::Down => "down",
            Command::DownTo(_) => "down-to",
            Command::Reset => "reset",
        }
    }

    /// Direction of the statements this command executes.
    pub fn direction(&self) -> Direction {
        match self {
            Command::Up | Command::UpOne | Command::UpTo(_) => Direction::Up,
            Command::Down | Command::DownTo(_) | Command::Reset => Direction::Down,
        }
    }

    /// Target version for `up-to` / `down-to`.
    pub fn target(&self) -> Option<Version> {
        match self {
            Command::UpTo(v) | Command::DownTo(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{} {}", self.name(), target),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
