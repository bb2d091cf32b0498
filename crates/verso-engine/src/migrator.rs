//! Migration engine
//!
//! [`Migrator`] applies and reverts migrations against a [`Database`]. Each
//! invocation:
//!
//! 1. takes the migrator's invocation lock,
//! 2. validates the full migration set,
//! 3. opens a transaction and reads the ledger's current version,
//! 4. executes the planned migrations one by one, updating the ledger after
//!    each,
//! 5. commits, or rolls back everything on the first error.
//!
//! The lock serialises invocations within one process only; concurrent
//! migrators in other processes are left to the database's transaction
//! isolation.

use crate::error::{EngineError, EngineResult};
use crate::report::{MigrationReport, MigrationState, MigrationStatus, StatusEntry, StepReport};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use verso_core::{plan, validate_migrations, Command, Direction, Migration, Version};
use verso_db::{Database, DbError};

/// Why an in-flight database call was abandoned.
enum Interrupt {
    Cancelled,
    TimedOut,
}

/// Cancellation scope of one invocation.
struct Deadline {
    cancel: CancellationToken,
    expires: Option<(Instant, Duration)>,
}

impl Deadline {
    fn new(cancel: CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            expires: timeout.map(|t| (Instant::now() + t, t)),
        }
    }

    fn error(&self, interrupt: Interrupt, version: Option<Version>) -> EngineError {
        match (interrupt, self.expires) {
            (Interrupt::TimedOut, Some((_, timeout))) => EngineError::TimedOut { timeout, version },
            _ => EngineError::Cancelled { version },
        }
    }

    /// Fail fast if the invocation was cancelled or has run out of time.
    fn check(&self, version: Option<Version>) -> EngineResult<()> {
        if self.cancel.is_cancelled() {
            return Err(self.error(Interrupt::Cancelled, version));
        }
        if let Some((at, _)) = self.expires {
            if Instant::now() >= at {
                return Err(self.error(Interrupt::TimedOut, version));
            }
        }
        Ok(())
    }

    /// Race `fut` against cancellation and the deadline.
    async fn guard<T, F>(&self, fut: F) -> Result<T, Interrupt>
    where
        F: Future<Output = T>,
    {
        let expired = async {
            match self.expires {
                Some((at, _)) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            () = self.cancel.cancelled() => Err(Interrupt::Cancelled),
            () = expired => Err(Interrupt::TimedOut),
            out = fut => Ok(out),
        }
    }
}

/// Applies and reverts migrations against a database.
///
/// The migration set is passed into every call; the migrator keeps no
/// migration state of its own.
pub struct Migrator {
    db: Arc<dyn Database>,
    lock: Mutex<()>,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl Migrator {
    /// Create a migrator over `db`.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            lock: Mutex::new(()),
            cancel: CancellationToken::new(),
            timeout: None,
        }
    }

    /// Abort invocations when `token` is cancelled.
    ///
    /// A cancelled token aborts the running invocation and rolls it back; every
    /// later invocation fails immediately.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Abort any invocation that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Token that cancels this migrator's invocations.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Apply every pending migration.
    pub async fn up(&self, migrations: &[Migration]) -> EngineResult<MigrationReport> {
        self.run(Command::Up, migrations).await
    }

    /// Apply pending migrations up to and including `target`.
    pub async fn up_to(
        &self,
        target: Version,
        migrations: &[Migration],
    ) -> EngineResult<MigrationReport> {
        self.run(Command::UpTo(target), migrations).await
    }

    /// Apply the next pending migration.
    pub async fn up_one(&self, migrations: &[Migration]) -> EngineResult<MigrationReport> {
        self.run(Command::UpOne, migrations).await
    }

    /// Revert the migration at the current version.
    pub async fn down(&self, migrations: &[Migration]) -> EngineResult<MigrationReport> {
        self.run(Command::Down, migrations).await
    }

    /// Revert applied migrations down to and including `target`.
    pub async fn down_to(
        &self,
        target: Version,
        migrations: &[Migration],
    ) -> EngineResult<MigrationReport> {
        self.run(Command::DownTo(target), migrations).await
    }

    /// Revert every applied migration.
    pub async fn reset(&self, migrations: &[Migration]) -> EngineResult<MigrationReport> {
        self.run(Command::Reset, migrations).await
    }

    /// Run a command given by name, e.g. from configuration or another tool.
    ///
    /// Unknown names and missing or unexpected targets yield a fatal
    /// [`EngineError::InvalidCommand`] before anything else happens.
    pub async fn run_named(
        &self,
        name: &str,
        target: Option<Version>,
        migrations: &[Migration],
    ) -> EngineResult<MigrationReport> {
        let command = Command::from_parts(name, target).map_err(EngineError::InvalidCommand)?;
        self.run(command, migrations).await
    }

    /// Run `command` over `migrations` as one atomic invocation.
    pub async fn run(
        &self,
        command: Command,
        migrations: &[Migration],
    ) -> EngineResult<MigrationReport> {
        let _guard = self.lock.lock().await;

        validate_migrations(migrations)?;

        let deadline = Deadline::new(self.cancel.child_token(), self.timeout);
        deadline.check(None)?;

        let db = self.db.as_ref();
        match deadline.guard(db.begin()).await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                return Err(EngineError::Transaction {
                    operation: "begin",
                    source,
                })
            }
            Err(interrupt) => {
                // The begin may have reached the database before the race was lost
                self.rollback_quietly().await;
                return Err(deadline.error(interrupt, None));
            }
        }

        let report = match self.execute(command, migrations, &deadline).await {
            Ok(report) => report,
            Err(err) => {
                self.rollback_quietly().await;
                return Err(err);
            }
        };

        if let Err(source) = db.commit().await {
            self.rollback_quietly().await;
            return Err(EngineError::Transaction {
                operation: "commit",
                source,
            });
        }

        log::info!(
            "{}: version {} -> {} ({} migration(s) {})",
            command,
            report.from,
            report.to,
            report.steps.len(),
            match report.direction {
                Direction::Up => "applied",
                Direction::Down => "reverted",
            }
        );
        Ok(report)
    }

    /// Body of the transaction: read the ledger, then apply or revert the plan.
    async fn execute(
        &self,
        command: Command,
        migrations: &[Migration],
        deadline: &Deadline,
    ) -> EngineResult<MigrationReport> {
        let db = self.db.as_ref();

        let current = deadline
            .guard(db.current_version())
            .await
            .map_err(|i| deadline.error(i, None))?
            .map_err(|source| EngineError::Ledger {
                operation: "read",
                version: None,
                source,
            })?;

        let plan = plan(command, migrations, current);
        let direction = plan.direction();
        log::debug!(
            "{} from version {}: {:?}",
            command,
            current,
            plan.versions()
        );

        if plan.is_empty() {
            if command == Command::Down && !current.is_none() {
                log::warn!("No migration with current version {current} in the set; nothing to revert");
            } else {
                log::info!("Nothing to do for {command} at version {current}");
            }
        }

        let mut steps = Vec::with_capacity(plan.steps.len());
        for migration in plan.steps {
            let version = migration.version;
            deadline.check(Some(version))?;

            let started = Instant::now();
            let sql = match direction {
                Direction::Up => &migration.up,
                Direction::Down => &migration.down,
            };
            deadline
                .guard(db.execute_batch(sql))
                .await
                .map_err(|i| deadline.error(i, Some(version)))?
                .map_err(|source| EngineError::Execution {
                    version,
                    direction,
                    source,
                })?;

            let (operation, recorded) = match direction {
                Direction::Up => ("append", deadline.guard(db.record_applied(version)).await),
                Direction::Down => ("remove", deadline.guard(db.record_reverted(version)).await),
            };
            recorded
                .map_err(|i| deadline.error(i, Some(version)))?
                .map_err(|source: DbError| EngineError::Ledger {
                    operation,
                    version: Some(version),
                    source,
                })?;

            let duration = started.elapsed();
            log::info!(
                "{} migration {} ({} ms)",
                match direction {
                    Direction::Up => "Applied",
                    Direction::Down => "Reverted",
                },
                migration.label(),
                duration.as_millis()
            );
            steps.push(StepReport {
                version,
                name: migration.name.clone(),
                duration,
            });
        }

        let to = if steps.is_empty() {
            current
        } else {
            deadline
                .guard(db.current_version())
                .await
                .map_err(|i| deadline.error(i, None))?
                .map_err(|source| EngineError::Ledger {
                    operation: "read",
                    version: None,
                    source,
                })?
        };

        Ok(MigrationReport {
            command,
            direction,
            from: current,
            to,
            steps,
        })
    }

    /// Roll back after a failure. A rollback error must not hide the error
    /// that caused it, so it is only logged.
    async fn rollback_quietly(&self) {
        if let Err(e) = self.db.rollback().await {
            log::warn!("Rollback failed: {e}");
        }
    }

    /// Compare the migration set with the ledger.
    ///
    /// Reads only; takes the invocation lock so it never observes a half-run
    /// invocation of this migrator.
    pub async fn status(&self, migrations: &[Migration]) -> EngineResult<MigrationStatus> {
        let _guard = self.lock.lock().await;

        validate_migrations(migrations)?;

        let read_err = |source| EngineError::Ledger {
            operation: "read",
            version: None,
            source,
        };
        let current = self.db.current_version().await.map_err(read_err)?;
        let applied: BTreeMap<Version, _> = self
            .db
            .applied_versions()
            .await
            .map_err(read_err)?
            .into_iter()
            .map(|e| (e.version, e.applied_at))
            .collect();

        let mut entries: Vec<StatusEntry> = migrations
            .iter()
            .map(|m| {
                let applied_at = applied.get(&m.version).copied();
                let state = match applied_at {
                    Some(_) => MigrationState::Applied,
                    None if m.version < current => MigrationState::Skipped,
                    None => MigrationState::Pending,
                };
                StatusEntry {
                    version: m.version,
                    name: m.name.clone(),
                    state,
                    applied_at,
                }
            })
            .collect();

        for (version, applied_at) in &applied {
            if !migrations.iter().any(|m| m.version == *version) {
                entries.push(StatusEntry {
                    version: *version,
                    name: None,
                    state: MigrationState::Missing,
                    applied_at: Some(*applied_at),
                });
            }
        }
        entries.sort_by_key(|e| e.version);

        Ok(MigrationStatus { current, entries })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
