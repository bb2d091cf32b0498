//! Creation of new migration files

use crate::error::{CoreError, CoreResult};
use crate::format::{self, MigrationBody};
use crate::source::{DirectorySource, MigrationSource, MIGRATION_EXTENSION};
use crate::version::Version;
use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

const TEMPLATE_UP: &str = "CREATE TABLE example ();";
const TEMPLATE_DOWN: &str = "DROP TABLE example;";

/// A freshly written migration file.
#[derive(Debug, Clone)]
pub struct CreatedMigration {
    /// Version assigned to the new migration
    pub version: Version,
    /// Path of the written file
    pub path: PathBuf,
}

fn validate_name(name: &str) -> CoreResult<()> {
    let reason = if name.trim().is_empty() {
        Some("name cannot be empty")
    } else if name.contains('/') || name.contains('\\') || name.contains("..") {
        Some("must not contain '/', '\\', or '..'")
    } else if name.starts_with('.') || name.starts_with('-') {
        Some("must not start with '.' or '-'")
    } else if name.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Write a template migration named `name` under `dir`.
///
/// The file lands in a dated subdirectory, `<dir>/<year>/<month name>/<day>/`,
/// and takes the next version after the highest one found anywhere under
/// `dir`. The directory is created when missing.
pub fn create_migration(dir: &Path, name: &str, date: NaiveDate) -> CoreResult<CreatedMigration> {
    validate_name(name)?;

    let latest = if dir.is_dir() {
        DirectorySource::new(dir)
            .load()?
            .into_iter()
            .map(|m| m.version)
            .max()
            .unwrap_or_default()
    } else {
        Version::NONE
    };
    let version = latest
        .next()
        .ok_or(CoreError::VersionsExhausted { latest })?;

    let dated_dir = dir
        .join(date.year().to_string())
        .join(date.format("%B").to_string())
        .join(date.day().to_string());
    std::fs::create_dir_all(&dated_dir).map_err(|e| CoreError::IoWithPath {
        path: dated_dir.display().to_string(),
        source: e,
    })?;

    let path = dated_dir.join(format!("{version}_{name}.{MIGRATION_EXTENSION}"));
    let text = format::encode(&MigrationBody::new(TEMPLATE_UP, TEMPLATE_DOWN));
    std::fs::write(&path, text).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;

    log::info!("Created migration file {}", path.display());
    Ok(CreatedMigration { version, path })
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
