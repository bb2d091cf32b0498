//! Status command implementation

use anyhow::Result;
use verso_engine::{MigrationState, MigrationStatus};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrations = ctx.load_migrations()?;
    let db = ctx.connect()?;

    let migrator = ctx.migrator(db, Default::default(), None);
    let status = migrator.status(&migrations).await?;

    match args.output {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Text => print_status(&status),
    }
    Ok(())
}

fn print_status(status: &MigrationStatus) {
    println!("Current version: {}\n", status.current);

    if status.entries.is_empty() {
        println!("No migrations found.");
        return;
    }

    println!("{:>8}  {:<8}  {:<19}  NAME", "VERSION", "STATE", "APPLIED AT");
    for entry in &status.entries {
        let applied_at = entry
            .applied_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8}  {:<8}  {:<19}  {}",
            entry.version.to_string(),
            entry.state.to_string(),
            applied_at,
            entry.name.as_deref().unwrap_or("")
        );
    }

    println!(
        "\n{} applied, {} pending",
        status.count(MigrationState::Applied),
        status.count(MigrationState::Pending)
    );
    for (state, note) in [
        (MigrationState::Skipped, "below the current version and will not be applied by `up`"),
        (MigrationState::Missing, "recorded in the ledger but missing from the migrations directory"),
    ] {
        let count = status.count(state);
        if count > 0 {
            println!("warning: {count} migration(s) {note}");
        }
    }
}
