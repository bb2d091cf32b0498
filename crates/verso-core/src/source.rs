//! Migration sources
//!
//! A [`MigrationSource`] supplies the unordered migration set for one
//! invocation. The engine never looks at where records came from, so a
//! directory on disk and a set compiled into the binary are interchangeable.

use crate::error::{CoreError, CoreResult};
use crate::format;
use crate::migration::Migration;
use crate::version::Version;
use std::path::{Path, PathBuf};

/// File extension of migration files.
pub const MIGRATION_EXTENSION: &str = "sql";

/// Supplier of migration records.
pub trait MigrationSource {
    /// Load every migration the source knows about, in no particular order.
    fn load(&self) -> CoreResult<Vec<Migration>>;
}

impl MigrationSource for Vec<Migration> {
    fn load(&self) -> CoreResult<Vec<Migration>> {
        Ok(self.clone())
    }
}

/// Split a migration file name into its version and descriptive name.
///
/// `12_add_orders.sql` yields `(12, Some("add_orders"))`; `12.sql` yields
/// `(12, None)`.
pub fn parse_file_name(file_name: &str) -> Result<(Version, Option<String>), String> {
    let stem = file_name
        .strip_suffix(MIGRATION_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(file_name);

    let (prefix, name) = match stem.split_once('_') {
        Some((prefix, name)) => (prefix, Some(name)),
        None => (stem, None),
    };

    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!(
            "expected '<version>_<name>.{MIGRATION_EXTENSION}', got '{file_name}'"
        ));
    }

    let version = prefix
        .parse::<Version>()
        .map_err(|e| format!("version '{prefix}' is out of range: {e}"))?;
    let name = name.filter(|n| !n.is_empty()).map(str::to_string);
    Ok((version, name))
}

fn migration_from_text(file_name: &str, text: &str) -> Result<Migration, String> {
    let (version, name) = parse_file_name(file_name)?;
    let body = format::decode(text);
    Ok(Migration {
        version,
        name,
        up: body.up,
        down: body.down,
    })
}

/// Migrations stored as `.sql` files under a directory tree.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect migration file paths below `dir`, sorted for stable output.
    fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        for path in paths {
            if path.is_dir() {
                Self::collect_files(&path, files)?;
            } else if path
                .extension()
                .is_some_and(|ext| ext == MIGRATION_EXTENSION)
            {
                files.push(path);
            } else {
                log::debug!("Skipping non-migration file {}", path.display());
            }
        }
        Ok(())
    }
}

impl MigrationSource for DirectorySource {
    fn load(&self) -> CoreResult<Vec<Migration>> {
        if !self.root.is_dir() {
            return Err(CoreError::MigrationsDirNotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut files = Vec::new();
        Self::collect_files(&self.root, &mut files)?;

        let mut migrations = Vec::with_capacity(files.len());
        for path in files {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| CoreError::InvalidFileName {
                    path: path.display().to_string(),
                    reason: "file name is not valid UTF-8".to_string(),
                })?;

            let text = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;

            let migration = migration_from_text(file_name, &text).map_err(|reason| {
                CoreError::InvalidFileName {
                    path: path.display().to_string(),
                    reason,
                }
            })?;
            migrations.push(migration);
        }

        log::debug!(
            "Loaded {} migration(s) from {}",
            migrations.len(),
            self.root.display()
        );
        Ok(migrations)
    }
}

/// Migrations compiled into the binary as `(file name, contents)` pairs,
/// typically built with `include_str!`.
#[derive(Debug, Clone, Copy)]
pub struct StaticSource {
    files: &'static [(&'static str, &'static str)],
}

impl StaticSource {
    /// Create a source over embedded files.
    pub const fn new(files: &'static [(&'static str, &'static str)]) -> Self {
        Self { files }
    }
}

impl MigrationSource for StaticSource {
    fn load(&self) -> CoreResult<Vec<Migration>> {
        self.files
            .iter()
            .map(|(file_name, text)| {
                migration_from_text(file_name, text).map_err(|reason| {
                    CoreError::InvalidFileName {
                        path: (*file_name).to_string(),
                        reason,
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
