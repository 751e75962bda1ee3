//! Error types for the AUR builder CLI.
//!
//! This module defines semantic error variants for every failure the build
//! workflow can hit. Variants are split into fatal conditions, which abort the
//! process with a non-zero exit code, and recoverable ones, which the workflow
//! logs before carrying on. See [`BuilderError::is_recoverable`].

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, editing, or building a package.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The user's home directory could not be determined.
    #[error("home directory not found")]
    HomeDirUnavailable,

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    Config {
        /// Path to the offending configuration file.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },

    /// A package name was rejected before any command ran.
    #[error("invalid package name {name:?}: {reason}")]
    InvalidPackageName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// Cloning a package repository failed.
    #[error("could not clone {url}: {message}")]
    Clone {
        /// Remote repository URL.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// A git operation on an existing working copy failed.
    #[error("git {operation} failed in {repo}: {message}")]
    Git {
        /// The git operation that failed (stash, pull).
        operation: &'static str,
        /// Working copy the operation ran in.
        repo: Utf8PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The working copy was still absent after fetching.
    #[error("working copy {path} does not exist")]
    WorkingCopyMissing {
        /// Expected working copy location.
        path: Utf8PathBuf,
    },

    /// The package database update failed.
    #[error("package database sync failed: {message}")]
    SystemUpdate {
        /// Description of the failure.
        message: String,
    },

    /// The editor exited unsuccessfully.
    #[error("editing {recipe} with {editor} failed: {message}")]
    Editor {
        /// Editor command that was run.
        editor: String,
        /// Recipe file that was being edited.
        recipe: Utf8PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// `makepkg` failed for a working copy.
    #[error("makepkg failed in {repo}: {message}")]
    Build {
        /// Working copy the build ran in.
        repo: Utf8PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// Listing the installed packages failed.
    #[error("could not list installed packages: {message}")]
    PackageListing {
        /// Description of the failure.
        message: String,
    },

    /// `PATH` is unset or empty.
    #[error("PATH is not set or is empty")]
    SearchPathUnset,

    /// No directory in `PATH` holds the executable.
    #[error("executable {name} not found in PATH")]
    ExecutableNotFound {
        /// Name of the executable that was searched for.
        name: String,
    },

    /// An external command could not be started.
    #[error("failed to run {program}")]
    CommandSpawn {
        /// Program that failed to start.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl BuilderError {
    /// Returns `true` for failures the build workflow logs and moves past.
    ///
    /// A failed package database sync or a failed editor session does not
    /// stop the build. Every other variant is fatal.
    ///
    /// # Examples
    ///
    /// ```
    /// use aur_builder::error::BuilderError;
    ///
    /// let update = BuilderError::SystemUpdate { message: "exit status: 1".to_owned() };
    /// assert!(update.is_recoverable());
    /// assert!(!BuilderError::SearchPathUnset.is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SystemUpdate { .. } | Self::Editor { .. })
    }
}

/// Result type alias using [`BuilderError`].
pub type Result<T> = std::result::Result<T, BuilderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn clone_error_includes_url_and_message() {
        let err = BuilderError::Clone {
            url: "https://aur.archlinux.org/foo.git".to_owned(),
            message: "repository not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://aur.archlinux.org/foo.git"));
        assert!(msg.contains("repository not found"));
    }

    #[test]
    fn git_error_includes_operation_and_repo() {
        let err = BuilderError::Git {
            operation: "stash",
            repo: Utf8PathBuf::from("/srv/store/foo"),
            message: "not a git repository".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("stash"));
        assert!(msg.contains("/srv/store/foo"));
    }

    #[test]
    fn command_spawn_preserves_source() {
        let err = BuilderError::CommandSpawn {
            program: "makepkg".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("makepkg"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[rstest]
    #[case::update(BuilderError::SystemUpdate { message: "boom".to_owned() }, true)]
    #[case::editor(
        BuilderError::Editor {
            editor: "vi".to_owned(),
            recipe: Utf8PathBuf::from("foo/PKGBUILD"),
            message: "boom".to_owned(),
        },
        true
    )]
    #[case::build(
        BuilderError::Build { repo: Utf8PathBuf::from("foo"), message: "boom".to_owned() },
        false
    )]
    #[case::clone(
        BuilderError::Clone { url: "u".to_owned(), message: "boom".to_owned() },
        false
    )]
    #[case::search_path(BuilderError::SearchPathUnset, false)]
    #[case::home(BuilderError::HomeDirUnavailable, false)]
    fn classifies_recoverable_errors(#[case] err: BuilderError, #[case] expected: bool) {
        assert_eq!(err.is_recoverable(), expected);
    }
}
