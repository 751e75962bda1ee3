//! Interactive shell access.

use crate::error::Result;
use crate::exec::{CommandExecutor, Invocation, StdioMode};
use crate::locate::locate;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Shell spawned by the `shell` subcommand.
pub const SHELL_NAME: &str = "bash";

/// Locates `bash` on `PATH` and runs it interactively.
///
/// The shell's own exit status is logged but not treated as an error.
///
/// # Errors
///
/// Returns [`crate::error::BuilderError::SearchPathUnset`] or
/// [`crate::error::BuilderError::ExecutableNotFound`] when the shell cannot
/// be located, and [`crate::error::BuilderError::CommandSpawn`] when it
/// cannot be started.
pub fn spawn_shell(executor: &dyn CommandExecutor, status: &mut dyn Write) -> Result<()> {
    let shell_path = locate(SHELL_NAME)?;
    run_shell(executor, &shell_path, status)
}

/// Runs the shell at `shell_path` with `-i`, attached to the terminal.
///
/// # Errors
///
/// Returns [`crate::error::BuilderError::CommandSpawn`] when the shell cannot
/// be started.
pub fn run_shell(
    executor: &dyn CommandExecutor,
    shell_path: &Path,
    status: &mut dyn Write,
) -> Result<()> {
    let invocation = Invocation::new(shell_path.to_string_lossy())
        .args(["-i"])
        .stdio(StdioMode::Inherit);

    writeln!(status, "Bash shell invoked")?;
    info!(subcommand = "shell", shell = %shell_path.display(), "Shell invoked");

    let output = executor.run(&invocation)?;
    debug!(subcommand = "shell", status = %output.status, "Shell exited");
    Ok(())
}
