//! System package database updates.
//!
//! The build workflow only depends on the [`SystemUpdater`] capability.
//! [`PacmanUpdater`] is the production implementation and runs
//! `sudo pacman -Syu --noconfirm` with the terminal attached, so password
//! prompts and progress stay visible.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, Invocation, StdioMode, run_checked};
use tracing::info;

/// Default privilege escalation command.
pub const DEFAULT_PRIVILEGE_COMMAND: &str = "sudo";

/// Synchronises and upgrades installed system packages.
#[cfg_attr(test, mockall::automock)]
pub trait SystemUpdater {
    /// Runs the update non-interactively.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::SystemUpdate`] when the update fails.
    fn update_packages(&self) -> Result<()>;
}

/// Updates the system through pacman behind a privilege escalation command.
pub struct PacmanUpdater<'a> {
    executor: &'a dyn CommandExecutor,
    privilege_command: String,
}

impl<'a> PacmanUpdater<'a> {
    /// Creates an updater that escalates with `sudo`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self {
            executor,
            privilege_command: DEFAULT_PRIVILEGE_COMMAND.to_owned(),
        }
    }

    /// Replaces the privilege escalation command (for example `doas`).
    #[must_use]
    pub fn with_privilege_command(mut self, command: impl Into<String>) -> Self {
        self.privilege_command = command.into();
        self
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(self.privilege_command.as_str())
            .args(["pacman", "-Syu", "--noconfirm"])
            .stdio(StdioMode::Inherit)
    }
}

impl SystemUpdater for PacmanUpdater<'_> {
    fn update_packages(&self) -> Result<()> {
        let invocation = self.invocation();
        info!(subcommand = "build", command = %invocation.display(), "Syncing package database");
        run_checked(self.executor, &invocation, |message| BuilderError::SystemUpdate { message })
            .map(drop)
    }
}
