//! Executable lookup across the directories listed in `PATH`.
//!
//! Each directory's whole subtree is searched, not just its top level, so an
//! executable nested below a `PATH` entry is still found. The returned path is
//! always the `PATH` entry joined with the executable name.

use crate::error::{BuilderError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Environment variable holding the search path.
pub const SEARCH_PATH_VAR: &str = "PATH";

/// Finds `executable` using the current process's `PATH`.
///
/// # Errors
///
/// Returns [`BuilderError::SearchPathUnset`] when `PATH` is unset or empty,
/// or [`BuilderError::ExecutableNotFound`] when no directory holds a file
/// named `executable`.
pub fn locate(executable: &str) -> Result<PathBuf> {
    let search_path = std::env::var_os(SEARCH_PATH_VAR)
        .filter(|value| !value.is_empty())
        .ok_or(BuilderError::SearchPathUnset)?;
    locate_in(&search_path, executable)
}

/// Finds `executable` in an explicit search path.
///
/// Directories are tried in order; missing directories are skipped. The first
/// directory whose subtree contains a non-directory entry named `executable`
/// wins and the search stops there.
///
/// # Errors
///
/// Returns [`BuilderError::ExecutableNotFound`] when no directory matches.
///
/// # Examples
///
/// ```no_run
/// use aur_builder::locate::locate_in;
/// use std::ffi::OsStr;
///
/// let bash = locate_in(OsStr::new("/usr/local/bin:/usr/bin"), "bash")?;
/// println!("{}", bash.display());
/// # Ok::<(), aur_builder::error::BuilderError>(())
/// ```
pub fn locate_in(search_path: &OsStr, executable: &str) -> Result<PathBuf> {
    std::env::split_paths(search_path)
        .filter(|dir| dir.is_dir())
        .find(|dir| contains_executable(dir, executable))
        .map(|dir| dir.join(executable))
        .ok_or_else(|| BuilderError::ExecutableNotFound {
            name: executable.to_owned(),
        })
}

fn contains_executable(dir: &Path, executable: &str) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(subcommand = "shell", dir = %dir.display(), error = %err, "Skipping unreadable entry");
                None
            }
        })
        .inspect(|entry| {
            debug!(
                subcommand = "shell",
                dir = %entry.path().display(),
                "Currently walking"
            );
        })
        .any(|entry| !entry.file_type().is_dir() && entry.file_name() == OsStr::new(executable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    fn join_search_path<I, P>(dirs: I) -> OsString
    where
        I: IntoIterator<Item = P>,
        P: AsRef<OsStr>,
    {
        std::env::join_paths(dirs).expect("search path directories contain no separator")
    }

    /// Three sibling search directories under one temporary root.
    struct SearchDirs {
        _temp: TempDir,
        dirs: Vec<PathBuf>,
    }

    impl SearchDirs {
        fn dir(&self, index: usize) -> &Path {
            self.dirs.get(index).expect("search dir index in range")
        }

        fn search_path(&self) -> OsString {
            join_search_path(&self.dirs)
        }
    }

    #[fixture]
    fn search_dirs() -> SearchDirs {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dirs: Vec<PathBuf> = ["first", "second", "third"]
            .iter()
            .map(|name| temp.path().join(name))
            .collect();
        for dir in &dirs {
            fs::create_dir_all(dir).expect("create search dir");
        }
        SearchDirs { _temp: temp, dirs }
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, "#!/bin/sh\n").expect("write executable");
    }

    #[rstest]
    #[case::first(0)]
    #[case::second(1)]
    #[case::third(2)]
    fn finds_executable_in_the_matching_directory(search_dirs: SearchDirs, #[case] index: usize) {
        touch(&search_dirs.dir(index).join("tool"));

        let found = locate_in(&search_dirs.search_path(), "tool").expect("expected a match");
        assert_eq!(found, search_dirs.dir(index).join("tool"));
    }

    #[rstest]
    fn nested_match_returns_the_search_directory_joined_with_name(search_dirs: SearchDirs) {
        touch(&search_dirs.dir(1).join("deep").join("er").join("tool"));

        let found = locate_in(&search_dirs.search_path(), "tool").expect("expected a match");
        assert_eq!(found, search_dirs.dir(1).join("tool"));
    }

    #[rstest]
    fn earlier_directories_take_precedence(search_dirs: SearchDirs) {
        touch(&search_dirs.dir(2).join("tool"));
        touch(&search_dirs.dir(0).join("nested").join("tool"));

        let found = locate_in(&search_dirs.search_path(), "tool").expect("expected a match");
        assert_eq!(found, search_dirs.dir(0).join("tool"));
    }

    #[rstest]
    fn directories_with_the_name_do_not_match(search_dirs: SearchDirs) {
        fs::create_dir_all(search_dirs.dir(0).join("tool")).expect("create dir");

        let err = locate_in(&search_dirs.search_path(), "tool").expect_err("expected no match");
        assert!(matches!(err, BuilderError::ExecutableNotFound { ref name } if name == "tool"));
    }

    #[rstest]
    fn missing_directories_are_skipped(search_dirs: SearchDirs) {
        touch(&search_dirs.dir(1).join("tool"));
        let missing = search_dirs.dir(0).join("does-not-exist");
        let path = join_search_path([missing.as_path(), search_dirs.dir(1)]);

        let found = locate_in(&path, "tool").expect("expected a match");
        assert_eq!(found, search_dirs.dir(1).join("tool"));
    }

    #[rstest]
    fn reports_not_found(search_dirs: SearchDirs) {
        let err = locate_in(&search_dirs.search_path(), "bash").expect_err("expected no match");
        assert!(matches!(err, BuilderError::ExecutableNotFound { .. }));
    }

    #[test]
    fn unset_path_is_reported() {
        temp_env::with_var_unset(SEARCH_PATH_VAR, || {
            let err = locate("bash").expect_err("expected failure");
            assert!(matches!(err, BuilderError::SearchPathUnset));
        });
    }

    #[test]
    fn empty_path_is_reported() {
        temp_env::with_var(SEARCH_PATH_VAR, Some(""), || {
            let err = locate("bash").expect_err("expected failure");
            assert!(matches!(err, BuilderError::SearchPathUnset));
        });
    }

    #[rstest]
    fn locate_reads_the_environment(search_dirs: SearchDirs) {
        touch(&search_dirs.dir(2).join("tool"));
        temp_env::with_var(SEARCH_PATH_VAR, Some(search_dirs.search_path()), || {
            let found = locate("tool").expect("expected a match");
            assert_eq!(found, search_dirs.dir(2).join("tool"));
        });
    }
}
