//! Configuration loading and resolution.
//!
//! Settings come from four layers, highest precedence first: command-line
//! flags, `AUR_BUILDER_*` environment variables (both handled by clap), the
//! TOML config file, and built-in defaults. The config file defaults to
//! `~/.aur-builder.toml`; a missing default file is not an error, but an
//! explicitly requested file must exist and parse.

use crate::dirs::{BaseDirs, default_config_path};
use crate::error::{BuilderError, Result};
use crate::update::DEFAULT_PRIVILEGE_COMMAND;
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

/// Directory under the starting working directory used when no base path is
/// configured.
pub const DEFAULT_STORE_DIR: &str = "store";

/// Diagnostic verbosity, from least to most verbose.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Log nothing.
    #[default]
    Panic,
    /// Log only errors that abort the process.
    Fatal,
    /// Log all errors.
    Error,
    /// Log warnings and errors.
    Warn,
    /// Log progress milestones.
    Info,
    /// Log everything, and show git's own output.
    Debug,
}

impl LogLevel {
    /// The tracing filter matching this level.
    ///
    /// Fatal conditions are logged at error level, so `fatal` and `error`
    /// share a filter.
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Panic => LevelFilter::OFF,
            Self::Fatal | Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }

    /// Whether external tool output (git) should reach the terminal.
    #[must_use]
    pub fn shows_tool_output(self) -> bool {
        self >= Self::Debug
    }
}

/// Contents of the TOML configuration file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Log level, as accepted by `--log`.
    pub log: Option<LogLevel>,
    /// Base directory for working copies, as accepted by `--basepath`.
    pub basepath: Option<Utf8PathBuf>,
    /// Command used to run pacman with elevated privileges.
    pub privilege_command: Option<String>,
}

impl ConfigFile {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Config`] naming `path` when the text is not
    /// valid configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use aur_builder::config::{ConfigFile, LogLevel};
    /// use camino::Utf8Path;
    ///
    /// let config = ConfigFile::parse(Utf8Path::new("inline"), "log = \"debug\"\n")?;
    /// assert_eq!(config.log, Some(LogLevel::Debug));
    /// # Ok::<(), aur_builder::error::BuilderError>(())
    /// ```
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| BuilderError::Config {
            path: path.to_owned(),
            reason: err.message().to_owned(),
        })
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Config`] when the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| BuilderError::Config {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;
        Self::parse(path, &contents)
    }
}

/// A configuration file together with where it was read from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadedConfig {
    /// Path the configuration was read from.
    pub path: Utf8PathBuf,
    /// Parsed contents.
    pub file: ConfigFile,
}

/// Finds and loads the configuration file.
///
/// With an explicit path the file must exist. Without one, the default
/// dotfile in the home directory is used when present.
///
/// # Errors
///
/// Returns [`BuilderError::HomeDirUnavailable`] when no path is given and the
/// home directory is unknown, or [`BuilderError::Config`] when a file cannot
/// be read or parsed.
pub fn discover_config(
    explicit: Option<&Utf8Path>,
    dirs: &dyn BaseDirs,
) -> Result<Option<LoadedConfig>> {
    let path = match explicit {
        Some(path) => path.to_owned(),
        None => {
            let path = default_config_path(dirs)?;
            if !path.exists() {
                return Ok(None);
            }
            path
        }
    };

    let file = ConfigFile::load(&path)?;
    Ok(Some(LoadedConfig { path, file }))
}

/// Values supplied on the command line or through the environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overrides<'a> {
    /// `--config`.
    pub config: Option<&'a Utf8Path>,
    /// `--log`.
    pub log: Option<LogLevel>,
    /// `--basepath`.
    pub basepath: Option<&'a Utf8Path>,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Effective log level.
    pub log_level: LogLevel,
    /// Base directory for working copies.
    pub base_dir: Utf8PathBuf,
    /// Privilege escalation command for pacman.
    pub privilege_command: String,
    /// Configuration file that was read, if any.
    pub config_path: Option<Utf8PathBuf>,
}

impl Settings {
    /// Merges overrides, the configuration file, and defaults.
    ///
    /// `cwd` is the working directory at startup; the default base directory
    /// is `<cwd>/store`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`discover_config`].
    pub fn resolve(overrides: Overrides<'_>, dirs: &dyn BaseDirs, cwd: &Utf8Path) -> Result<Self> {
        let loaded = discover_config(overrides.config, dirs)?;
        Ok(Self::merge(overrides, loaded, cwd))
    }

    /// Merges already loaded configuration with overrides and defaults.
    #[must_use]
    pub fn merge(overrides: Overrides<'_>, loaded: Option<LoadedConfig>, cwd: &Utf8Path) -> Self {
        let (config_path, file) = match loaded {
            Some(LoadedConfig { path, file }) => (Some(path), file),
            None => (None, ConfigFile::default()),
        };

        Self {
            log_level: overrides.log.or(file.log).unwrap_or_default(),
            base_dir: overrides
                .basepath
                .map(Utf8Path::to_owned)
                .or(file.basepath)
                .unwrap_or_else(|| cwd.join(DEFAULT_STORE_DIR)),
            privilege_command: file
                .privilege_command
                .filter(|command| !command.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRIVILEGE_COMMAND.to_owned()),
            config_path,
        }
    }
}
