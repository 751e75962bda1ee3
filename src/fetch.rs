//! Fetching package build recipes from the AUR.
//!
//! A package's working copy lives at `<base_dir>/<package>`. The first fetch
//! clones it; later fetches stash local edits and pull upstream changes. All
//! git commands carry the working copy as their working directory.

use crate::dirs::{BaseDirs, home_dir_utf8};
use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, Invocation, StdioMode, run_checked};
use crate::package::PackageName;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::ErrorKind;
use tracing::{debug, info, warn};

/// How the working copy was brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    /// The repository was cloned fresh.
    Cloned,
    /// An existing clone was stashed and pulled.
    Updated,
}

/// A package's local working copy after a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    path: Utf8PathBuf,
    action: FetchAction,
}

impl WorkingCopy {
    /// Directory holding the package's `PKGBUILD`.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the fetch cloned or updated.
    #[must_use]
    pub fn action(&self) -> FetchAction {
        self.action
    }
}

/// Clones or refreshes AUR working copies.
pub struct SourceFetcher<'a> {
    executor: &'a dyn CommandExecutor,
    dirs: &'a dyn BaseDirs,
    git_output: StdioMode,
}

impl<'a> SourceFetcher<'a> {
    /// Creates a fetcher. git output is silenced; see [`Self::with_git_output`].
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, dirs: &'a dyn BaseDirs) -> Self {
        Self {
            executor,
            dirs,
            git_output: StdioMode::Silent,
        }
    }

    /// Sets how git's output is wired.
    #[must_use]
    pub fn with_git_output(mut self, git_output: StdioMode) -> Self {
        self.git_output = git_output;
        self
    }

    /// Ensures an up-to-date working copy of `package` exists under `base_dir`.
    ///
    /// When `base_dir` does not exist the home directory is used instead for
    /// this call.
    ///
    /// # Errors
    ///
    /// - [`BuilderError::HomeDirUnavailable`] if the fallback is needed but the
    ///   home directory is unknown.
    /// - [`BuilderError::Clone`] if cloning fails.
    /// - [`BuilderError::Git`] if `git stash` or `git pull` fails; a failed
    ///   stash skips the pull.
    /// - [`BuilderError::WorkingCopyMissing`] if the clone left nothing behind.
    pub fn fetch(&self, package: &PackageName, base_dir: &Utf8Path) -> Result<WorkingCopy> {
        let url = package.aur_url();
        debug!(subcommand = "build", url = %url, pkg = %package, "Arch pkg url");

        let base_dir = resolve_base_dir(base_dir, self.dirs)?;
        let repo_dir = base_dir.join(package.as_str());
        debug!(
            subcommand = "build",
            repo_dir = %repo_dir,
            base_dir = %base_dir,
            pkg = %package,
            "Input data check"
        );

        match std::fs::metadata(&repo_dir) {
            Ok(_) => {
                self.update(package, &repo_dir)?;
                Ok(WorkingCopy {
                    path: repo_dir,
                    action: FetchAction::Updated,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.clone_into(&url, &repo_dir)?;
                ensure_exists(&repo_dir)?;
                Ok(WorkingCopy {
                    path: repo_dir,
                    action: FetchAction::Cloned,
                })
            }
            Err(err) => {
                warn!(subcommand = "build", repo = %repo_dir, error = %err, "Could not find directory");
                Err(BuilderError::Io(err))
            }
        }
    }

    fn clone_into(&self, url: &str, repo_dir: &Utf8Path) -> Result<()> {
        info!(subcommand = "build", url = %url, repo = %repo_dir, "Cloning the remote repo");
        let invocation = Invocation::new("git")
            .args(["clone", url, repo_dir.as_str()])
            .stdio(self.git_output);

        run_checked(self.executor, &invocation, |message| BuilderError::Clone {
            url: url.to_owned(),
            message,
        })
        .map(drop)
    }

    fn update(&self, package: &PackageName, repo_dir: &Utf8Path) -> Result<()> {
        for operation in ["stash", "pull"] {
            info!(subcommand = "build", repo = %repo_dir, pkg = %package, operation, "Updating the local repo");
            let invocation = Invocation::new("git")
                .args([operation])
                .current_dir(repo_dir)
                .stdio(self.git_output);

            let result = run_checked(self.executor, &invocation, |message| BuilderError::Git {
                operation,
                repo: repo_dir.to_owned(),
                message,
            });

            if let Err(err) = result {
                warn!(subcommand = "build", pkg = %package, error = %err, "Could not {operation}");
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Returns `base_dir`, or the home directory when `base_dir` does not exist.
///
/// # Errors
///
/// Returns [`BuilderError::HomeDirUnavailable`] when the fallback is needed
/// but the home directory cannot be resolved.
pub fn resolve_base_dir(base_dir: &Utf8Path, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    if base_dir.exists() {
        return Ok(base_dir.to_owned());
    }

    let home = home_dir_utf8(dirs)?;
    warn!(
        subcommand = "build",
        base_dir = %base_dir,
        home = %home,
        "Base directory does not exist, using the home directory"
    );
    Ok(home)
}

fn ensure_exists(repo_dir: &Utf8Path) -> Result<()> {
    match std::fs::metadata(repo_dir) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(BuilderError::WorkingCopyMissing {
            path: repo_dir.to_owned(),
        }),
        Err(err) => Err(BuilderError::Io(err)),
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
