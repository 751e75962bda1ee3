//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind the [`BaseDirs`] trait so the home
//! directory fallback and config discovery can be exercised in tests without
//! touching the real environment.

use camino::Utf8PathBuf;
use std::path::PathBuf;

use crate::error::{BuilderError, Result};

/// File name of the per-user configuration file in the home directory.
pub const CONFIG_FILE_NAME: &str = ".aur-builder.toml";

/// Resolves base directories for the current user.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory, if it can be determined.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Resolves directories from the host environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }
}

/// Returns the home directory as a UTF-8 path.
///
/// # Errors
///
/// Returns [`BuilderError::HomeDirUnavailable`] when the home directory is
/// unknown or not valid UTF-8.
pub fn home_dir_utf8(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    dirs.home_dir()
        .and_then(|home| Utf8PathBuf::try_from(home).ok())
        .ok_or(BuilderError::HomeDirUnavailable)
}

/// Returns the default configuration file path, `~/.aur-builder.toml`.
///
/// # Errors
///
/// Returns [`BuilderError::HomeDirUnavailable`] when the home directory is
/// unknown.
pub fn default_config_path(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    home_dir_utf8(dirs).map(|home| home.join(CONFIG_FILE_NAME))
}

/// Gets the current directory as a UTF-8 path.
///
/// # Errors
///
/// Returns [`BuilderError::Io`] when the current directory cannot be read or
/// is not valid UTF-8.
pub fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| BuilderError::Io(e.into_io_error()))
}
