//! Verso CLI - versioned SQL schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{create, init, migrate, status};
use verso_core::{Command, Version};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(verbose)
        .init();
}

async fn dispatch(cli: &Cli) -> Result<()> {
    let global = &cli.global;
    match &cli.command {
        Commands::Init(args) => init::execute(args, global).await,
        Commands::Create(args) => create::execute(args, global).await,
        Commands::Status(args) => status::execute(args, global).await,
        Commands::Up(args) => migrate::execute(Command::Up, args, global).await,
        Commands::UpOne(args) => migrate::execute(Command::UpOne, args, global).await,
        Commands::UpTo(args) => {
            let command = Command::UpTo(Version::new(args.version));
            migrate::execute(command, &args.migrate, global).await
        }
        Commands::Down(args) => migrate::execute(Command::Down, args, global).await,
        Commands::DownTo(args) => {
            let command = Command::DownTo(Version::new(args.version));
            migrate::execute(command, &args.migrate, global).await
        }
        Commands::Reset(args) => migrate::execute(Command::Reset, args, global).await,
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match dispatch(&cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1)),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
