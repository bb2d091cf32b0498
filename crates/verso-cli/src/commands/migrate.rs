//! Migrate commands: up, up-one, up-to, down, down-to, reset

use anyhow::Result;
use std::error::Error as _;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use verso_core::{Command, Direction};
use verso_engine::{EngineError, MigrationReport};

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common::{print_json, ExitCode, EXIT_FAILED, EXIT_FATAL, EXIT_INTERRUPTED};
use crate::context::RuntimeContext;

/// Run `command` against the project's database.
///
/// Ctrl-C cancels the invocation; the engine rolls it back before returning.
pub(crate) async fn execute(command: Command, args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrations = ctx.load_migrations()?;
    let db = ctx.connect()?;

    let token = CancellationToken::new();
    let migrator = ctx.migrator(db, token.clone(), args.timeout.map(Duration::from_secs));

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, rolling back");
            token.cancel();
        }
    });

    let result = migrator.run(command, &migrations).await;
    interrupt.abort();

    match result {
        Ok(report) => {
            match args.output {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print_report(&report),
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{command} failed: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            Err(ExitCode(exit_code(&err)).into())
        }
    }
}

fn exit_code(err: &EngineError) -> i32 {
    match err {
        _ if err.is_fatal() => EXIT_FATAL,
        EngineError::Cancelled { .. } | EngineError::TimedOut { .. } => EXIT_INTERRUPTED,
        _ => EXIT_FAILED,
    }
}

fn print_report(report: &MigrationReport) {
    if report.is_noop() {
        println!("Nothing to do (version {})", report.to);
        return;
    }

    let verb = match report.direction {
        Direction::Up => "Applied",
        Direction::Down => "Reverted",
    };
    for step in &report.steps {
        match &step.name {
            Some(name) => println!(
                "  {verb} {} ({name}) in {}ms",
                step.version,
                step.duration.as_millis()
            ),
            None => println!("  {verb} {} in {}ms", step.version, step.duration.as_millis()),
        }
    }
    println!(
        "\nVersion {} -> {} ({} migration(s))",
        report.from,
        report.to,
        report.steps.len()
    );
}
