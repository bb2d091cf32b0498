//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Verso - versioned SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "verso")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true, env = "VERSO_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create verso.yml and the migrations directory
    Init(InitArgs),

    /// Write a new, empty migration file
    Create(CreateArgs),

    /// Apply every pending migration
    Up(MigrateArgs),

    /// Apply the next pending migration
    UpOne(MigrateArgs),

    /// Apply pending migrations up to and including a version
    UpTo(TargetArgs),

    /// Revert the migration at the current version
    Down(MigrateArgs),

    /// Revert applied migrations down to and including a version
    DownTo(TargetArgs),

    /// Revert every applied migration
    Reset(MigrateArgs),

    /// Show the current version and the state of every migration
    Status(StatusArgs),
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Database path written to verso.yml
    #[arg(long, default_value = "verso.duckdb")]
    pub database_path: String,

    /// Migrations directory written to verso.yml
    #[arg(long, default_value = "migrations")]
    pub migrations_dir: String,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name, used in the file name
    pub name: String,
}

/// Arguments shared by the migrate commands
#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Abort and roll back if the invocation runs longer than this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// Arguments for up-to and down-to
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Target version (inclusive)
    pub version: u64,

    #[command(flatten)]
    pub migrate: MigrateArgs,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
