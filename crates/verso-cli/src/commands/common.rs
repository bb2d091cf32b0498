//! Shared utilities for CLI commands

use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ExitCode is control flow, not a message; main prints nothing for it
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code for a migration that failed and was rolled back
pub(crate) const EXIT_FAILED: i32 = 1;

/// Exit code for a caller error the engine refused to run
pub(crate) const EXIT_FATAL: i32 = 2;

/// Exit code for a cancelled or timed-out invocation
pub(crate) const EXIT_INTERRUPTED: i32 = 130;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
