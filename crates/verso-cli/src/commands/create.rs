//! Create command implementation - writes a new migration file

use anyhow::{Context, Result};
use verso_core::scaffold::create_migration;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the create command
pub(crate) async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let today = chrono::Local::now().date_naive();

    let created = create_migration(&ctx.migrations_dir, &args.name, today)
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    println!(
        "Created migration {} at {}",
        created.version,
        created.path.display()
    );
    Ok(())
}
