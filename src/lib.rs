//! AUR builder library.
//!
//! This crate provides the core functionality for fetching Arch User
//! Repository packages, keeping the host system up to date, offering a
//! `PKGBUILD` review, and running `makepkg`. It is used by the `aur-builder`
//! CLI binary and can be driven programmatically with a scripted
//! [`exec::CommandExecutor`] in tests.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Configuration file loading and settings resolution
//! - [`dirs`] - Directory resolution abstraction for the home directory
//! - [`editor`] - Optional `PKGBUILD` editing
//! - [`error`] - Semantic error types and their fatal/recoverable split
//! - [`exec`] - External command invocation
//! - [`fetch`] - Cloning and refreshing working copies
//! - [`locate`] - Executable lookup on the search path
//! - [`logging`] - Diagnostic log setup
//! - [`makepkg`] - Building a working copy
//! - [`package`] - Validated package names
//! - [`packages`] - Installed package listing
//! - [`prompt`] - Yes/no confirmation prompts
//! - [`shell`] - Interactive shell access
//! - [`update`] - System package updates
//! - [`workflow`] - The ordered build workflow

pub mod cli;
pub mod config;
pub mod dirs;
pub mod editor;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod locate;
pub mod logging;
pub mod makepkg;
pub mod package;
pub mod packages;
pub mod prompt;
pub mod shell;
pub mod update;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
