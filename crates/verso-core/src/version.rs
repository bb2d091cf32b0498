//! Strongly-typed migration version.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A migration version number.
///
/// Versions are the sole ordering and identity key of a migration. The value
/// `0` is reserved for "nothing applied" and is represented by
/// [`Version::NONE`]; a [`Migration`](crate::Migration) carrying it fails
/// validation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// The ledger position before any migration has been applied.
    pub const NONE: Version = Version(0);

    /// Highest usable version. The ledger stores versions as signed 64-bit
    /// integers.
    pub const MAX: Version = Version(i64::MAX as u64);

    /// Wrap a raw version number.
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Return the raw version number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for [`Version::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if a migration may carry this version: above
    /// [`NONE`](Self::NONE) and at most [`MAX`](Self::MAX).
    pub const fn is_usable(self) -> bool {
        self.0 > 0 && self.0 <= Self::MAX.0
    }

    /// The version after this one, or `None` past [`Version::MAX`].
    pub fn next(self) -> Option<Version> {
        self.0
            .checked_add(1)
            .map(Version)
            .filter(|v| v.is_usable())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(version: u64) -> Self {
        Self(version)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl FromStr for Version {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
