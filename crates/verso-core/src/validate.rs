//! Structural validation of a migration set

use crate::error::ValidationError;
use crate::migration::Migration;
use std::collections::HashSet;

/// Check a migration set before anything touches the database.
///
/// Records are scanned in input order and each record is checked for, in
/// order: a version outside `1..=`[`Version::MAX`](crate::Version::MAX), a blank `up`, a blank `down`, and a version already
/// seen on an earlier record. The first violation is returned, so the result
/// is deterministic for a given input.
pub fn validate_migrations(migrations: &[Migration]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(migrations.len());

    for migration in migrations {
        let version = migration.version;
        if !version.is_usable() {
            return Err(ValidationError::InvalidVersion { version });
        }
        if migration.up.trim().is_empty() {
            return Err(ValidationError::MissingUp { version });
        }
        if migration.down.trim().is_empty() {
            return Err(ValidationError::MissingDown { version });
        }
        if !seen.insert(version) {
            return Err(ValidationError::DuplicateVersion { version });
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
