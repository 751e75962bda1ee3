//! Installed package listing, shown when no subcommand is given.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, Invocation, StdioMode, run_checked};
use std::io::Write;

/// Runs `pacman -Q` and returns its output.
///
/// # Errors
///
/// Returns [`BuilderError::PackageListing`] when pacman cannot be started or
/// exits unsuccessfully.
pub fn installed_packages(executor: &dyn CommandExecutor) -> Result<String> {
    let invocation = Invocation::new("pacman")
        .args(["-Q"])
        .stdio(StdioMode::Capture);

    let output = run_checked(executor, &invocation, |message| BuilderError::PackageListing {
        message,
    })?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Writes the installed package list to `out`.
///
/// # Errors
///
/// Returns [`BuilderError::PackageListing`] when listing fails, or
/// [`BuilderError::Io`] when writing fails.
pub fn print_installed_packages(executor: &dyn CommandExecutor, out: &mut dyn Write) -> Result<()> {
    let listing = installed_packages(executor)?;
    write!(out, "{listing}")?;
    if !listing.is_empty() && !listing.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
