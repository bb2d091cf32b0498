//! Init command implementation - scaffolds verso.yml and the migrations directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use verso_core::config::{CONFIG_FILE_NAMES, DEFAULT_LEDGER_TABLE};
use verso_core::Config;

use crate::cli::{GlobalArgs, InitArgs};

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let project_dir = Path::new(&global.project_dir);

    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.exists())
    {
        anyhow::bail!(
            "{} already exists. Remove it or edit it directly.",
            existing.display()
        );
    }

    let database_path = global.database.as_deref().unwrap_or(&args.database_path);

    // Escape YAML special characters in interpolated values
    let config_content = format!(
        r#"# Verso project configuration

migrations_dir: "{migrations_dir}"

database:
  path: "{db_path}"

ledger:
  table: {ledger_table}

# Abort and roll back a migrate invocation after this many seconds
# timeout_secs: 300
"#,
        migrations_dir = args.migrations_dir.replace('"', "\\\""),
        db_path = database_path.replace('"', "\\\""),
        ledger_table = DEFAULT_LEDGER_TABLE,
    );

    // Reject anything the loader would reject before writing it out
    let config: Config =
        serde_yaml::from_str(&config_content).context("Generated configuration is invalid")?;
    config.validate()?;

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

    let config_path = project_dir.join(CONFIG_FILE_NAMES[0]);
    fs::write(&config_path, config_content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let migrations_dir = config.migrations_dir_absolute(project_dir);
    fs::create_dir_all(&migrations_dir).with_context(|| {
        format!("Failed to create directory: {}", migrations_dir.display())
    })?;

    println!("Initialized verso project in {}", project_dir.display());
    println!("  config:     {}", config_path.display());
    println!("  migrations: {}", migrations_dir.display());
    println!("\nNext: verso create <name>");
    Ok(())
}
