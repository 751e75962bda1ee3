//! The `build` subcommand: fetch, update, edit, build.
//!
//! Each stage runs at most once and strictly in order. Fetch and build
//! failures abort the workflow. Errors from the update and edit stages are
//! logged and the workflow carries on when [`BuilderError::is_recoverable`]
//! allows it.

use crate::editor::{EditOutcome, RecipeEditor};
use crate::error::{BuilderError, Result};
use crate::fetch::{FetchAction, SourceFetcher, WorkingCopy};
use crate::makepkg::BuildInvoker;
use crate::package::PackageName;
use crate::prompt::Confirm;
use crate::update::SystemUpdater;
use camino::Utf8Path;
use std::io::Write;
use tracing::{error, info};

/// What a completed build run did.
#[derive(Debug)]
pub struct BuildReport {
    /// Working copy that was built.
    pub working_copy: WorkingCopy,
    /// Recoverable failures that were logged along the way.
    pub recovered: Vec<BuilderError>,
    /// Outcome of the edit offer; `None` when the editor failed.
    pub edit: Option<EditOutcome>,
}

/// Runs the build stages for one package.
pub struct BuildWorkflow<'a> {
    fetcher: SourceFetcher<'a>,
    updater: &'a dyn SystemUpdater,
    editor: RecipeEditor<'a>,
    invoker: BuildInvoker<'a>,
}

impl<'a> BuildWorkflow<'a> {
    /// Assembles a workflow from its stages.
    #[must_use]
    pub fn new(
        fetcher: SourceFetcher<'a>,
        updater: &'a dyn SystemUpdater,
        editor: RecipeEditor<'a>,
        invoker: BuildInvoker<'a>,
    ) -> Self {
        Self {
            fetcher,
            updater,
            editor,
            invoker,
        }
    }

    /// Fetches `package` under `base_dir`, updates the system, offers an edit,
    /// and builds.
    ///
    /// Status lines go to `status`; `prompt` answers the edit question.
    ///
    /// # Errors
    ///
    /// Returns the fetch or build error that stopped the workflow. Recoverable
    /// errors are collected in the [`BuildReport`] instead.
    pub fn run(
        &self,
        package: &PackageName,
        base_dir: &Utf8Path,
        prompt: &mut dyn Confirm,
        status: &mut dyn Write,
    ) -> Result<BuildReport> {
        writeln!(status, "Building {package}")?;
        info!(subcommand = "build", pkg = %package, "Building package");

        let working_copy = self
            .fetcher
            .fetch(package, base_dir)
            .inspect_err(|err| {
                error!(subcommand = "build", pkg = %package, error = %err, "Could not fetch package");
            })?;
        report_fetch(package, &working_copy, status)?;

        let mut recovered = Vec::new();

        if let Err(err) = self.updater.update_packages() {
            let err = recover(err)?;
            error!(subcommand = "build", pkg = %package, error = %err, "System update failed");
            recovered.push(err);
        }

        let edit = match self.editor.maybe_edit(working_copy.path(), prompt) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                let err = recover(err)?;
                error!(
                    subcommand = "build",
                    pkg = %package,
                    editor = %self.editor.editor(),
                    error = %err,
                    "Error while opening editor"
                );
                recovered.push(err);
                None
            }
        };

        self.invoker.build(working_copy.path(), status)?;
        info!(subcommand = "build", pkg = %package, repo = %working_copy.path(), "Build finished");

        Ok(BuildReport {
            working_copy,
            recovered,
            edit,
        })
    }
}

/// Hands back a recoverable error for logging; fatal errors abort the run.
fn recover(err: BuilderError) -> Result<BuilderError> {
    if err.is_recoverable() {
        Ok(err)
    } else {
        error!(subcommand = "build", error = %err, "Unrecoverable failure");
        Err(err)
    }
}

fn report_fetch(
    package: &PackageName,
    working_copy: &WorkingCopy,
    status: &mut dyn Write,
) -> Result<()> {
    match working_copy.action() {
        FetchAction::Cloned => writeln!(
            status,
            "Cloned {} into {}",
            package.aur_url(),
            working_copy.path()
        )?,
        FetchAction::Updated => writeln!(status, "Updated {}", working_copy.path())?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
