//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use verso_core::{Config, DirectorySource, Migration, MigrationSource};
use verso_db::{Database, DatabaseCore, DuckDbBackend};
use verso_engine::Migrator;

use crate::cli::GlobalArgs;

/// Loaded configuration and resolved paths for one CLI run
pub struct RuntimeContext {
    /// The loaded configuration, with CLI overrides applied
    pub config: Config,

    /// Project root
    pub project_dir: PathBuf,

    /// Absolute migrations directory
    pub migrations_dir: PathBuf,
}

impl RuntimeContext {
    /// Load configuration for the project named by the global arguments.
    ///
    /// Does not touch the database; see [`connect`](Self::connect).
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let project_dir = PathBuf::from(&args.project_dir);

        let mut config = match &args.config {
            Some(path) => {
                Config::load(Path::new(path)).context("Failed to load configuration file")?
            }
            None => Config::load_from_dir(&project_dir)
                .context("Failed to load project configuration")?,
        };

        if let Some(database) = &args.database {
            config.database.path = database.clone();
            config
                .validate()
                .context("Invalid --database override")?;
        }

        let migrations_dir = config.migrations_dir_absolute(&project_dir);
        log::debug!(
            "Project {}, migrations in {}, database {}",
            project_dir.display(),
            migrations_dir.display(),
            config.database.path
        );

        Ok(Self {
            config,
            project_dir,
            migrations_dir,
        })
    }

    /// Database path with relative file paths resolved against the project
    pub fn database_path(&self) -> String {
        let path = &self.config.database.path;
        if path == ":memory:" || Path::new(path).is_absolute() {
            path.clone()
        } else {
            self.project_dir.join(path).display().to_string()
        }
    }

    /// Open the configured database with the configured ledger table
    pub fn connect(&self) -> Result<Arc<dyn Database>> {
        let path = self.database_path();
        let db = DuckDbBackend::new(&path)
            .and_then(|db| db.with_ledger_table(&self.config.ledger.table))
            .with_context(|| format!("Failed to connect to database: {path}"))?;
        log::debug!(
            "Connected to {} database {path} (ledger table {})",
            db.db_type(),
            db.ledger_table()
        );
        Ok(Arc::new(db))
    }

    /// Read every migration file under the migrations directory
    pub fn load_migrations(&self) -> Result<Vec<Migration>> {
        let migrations = DirectorySource::new(&self.migrations_dir)
            .load()
            .context("Failed to load migrations")?;
        log::debug!(
            "Loaded {} migration(s) from {}",
            migrations.len(),
            self.migrations_dir.display()
        );
        Ok(migrations)
    }

    /// Build a migrator over `db`, cancelled by `token`.
    ///
    /// `timeout` overrides the configured `timeout_secs`.
    pub fn migrator(
        &self,
        db: Arc<dyn Database>,
        token: CancellationToken,
        timeout: Option<Duration>,
    ) -> Migrator {
        let migrator = Migrator::new(db).with_cancellation(token);
        match timeout.or_else(|| self.config.timeout()) {
            Some(timeout) => migrator.with_timeout(timeout),
            None => migrator,
        }
    }
}
