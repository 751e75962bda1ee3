//! CLI argument definitions for the AUR builder.
//!
//! Kept apart from the binary entrypoint so argument parsing can be unit
//! tested without running any commands.

use crate::config::{LogLevel, Overrides};
use crate::package::PackageName;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Fetch, review, and build packages from the Arch User Repository.
#[derive(Parser, Debug)]
#[command(name = "aur-builder")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch, review, and build packages from the Arch User Repository.\n\n",
    "The build subcommand clones a package's recipe repository (or stashes and ",
    "pulls an existing clone), upgrades the system with pacman, offers to open ",
    "the PKGBUILD in $EDITOR, then runs makepkg in the working copy.\n\n",
    "Without a subcommand, the installed packages are listed.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build a package into ./store:\n",
    "    $ aur-builder build yay\n\n",
    "  Build into a custom directory with debug logging:\n",
    "    $ aur-builder --log debug build --basepath ~/aur paru\n\n",
    "  List installed packages:\n",
    "    $ aur-builder\n\n",
    "CONFIGURATION:\n",
    "  ~/.aur-builder.toml may set `log`, `basepath`, and `privilege_command`.\n",
    "  Flags take precedence over AUR_BUILDER_* variables, which take\n",
    "  precedence over the file.",
))]
pub struct Cli {
    /// Subcommand to execute; lists installed packages when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file [default: ~/.aur-builder.toml].
    #[arg(long, global = true, value_name = "PATH", env = "AUR_BUILDER_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    /// Log level [default: panic].
    #[arg(
        long,
        global = true,
        value_enum,
        value_name = "LEVEL",
        env = "AUR_BUILDER_LOG"
    )]
    pub log: Option<LogLevel>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch, update the system, optionally edit, and build a package.
    Build(BuildArgs),

    /// Spawn an interactive bash shell.
    Shell,
}

/// Arguments for the build command.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Directory holding working copies [default: ./store].
    #[arg(long, value_name = "DIR", env = "AUR_BUILDER_BASEPATH")]
    pub basepath: Option<Utf8PathBuf>,

    /// Name of the AUR package to build.
    #[arg(value_name = "PACKAGE")]
    pub package: PackageName,
}

impl Cli {
    /// Name of the selected subcommand, for log context.
    #[must_use]
    pub fn subcommand_name(&self) -> &'static str {
        match self.command {
            Some(Command::Build(_)) => "build",
            Some(Command::Shell) => "shell",
            None => "list",
        }
    }

    /// Settings supplied through flags or the environment.
    #[must_use]
    pub fn overrides(&self) -> Overrides<'_> {
        let basepath = match &self.command {
            Some(Command::Build(args)) => args.basepath.as_deref(),
            _ => None,
        };
        Overrides {
            config: self.config.as_deref(),
            log: self.log,
            basepath,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
