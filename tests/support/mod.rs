//! Sandbox for running the compiled binary against fake system tools.
//!
//! Each sandbox owns a temporary directory holding a `bin/` directory of
//! shell-script stand-ins for `git`, `sudo`, `makepkg`, and `pacman`, a
//! `store/` base directory, a config file, and a call log. The scripts append
//! one line per invocation to the log so tests can assert the exact order of
//! external commands.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const GIT_SCRIPT: &str = r#"#!/bin/sh
echo "git $*" >> "$FAKE_LOG"
case "$1" in
  clone) /bin/mkdir -p "$3" ;;
  stash) [ -z "$FAKE_STASH_FAIL" ] || exit 1 ;;
esac
exit 0
"#;

const SUDO_SCRIPT: &str = r#"#!/bin/sh
echo "sudo $*" >> "$FAKE_LOG"
exit 0
"#;

const MAKEPKG_SCRIPT: &str = r#"#!/bin/sh
echo "makepkg $* in $(pwd -P)" >> "$FAKE_LOG"
exit 0
"#;

const PACMAN_SCRIPT: &str = r#"#!/bin/sh
echo "pacman $*" >> "$FAKE_LOG"
printf 'bash 5.2.026-2\ngit 2.45.2-1\n'
"#;

/// Temporary environment for one end-to-end run.
pub struct Sandbox {
    _temp: TempDir,
    root: PathBuf,
}

impl Sandbox {
    /// Creates the sandbox with fake tools, an empty store, and a config file.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = temp
            .path()
            .canonicalize()
            .expect("failed to canonicalise temp dir");

        let sandbox = Self { _temp: temp, root };
        fs::create_dir(sandbox.bin_dir()).expect("create bin dir");
        fs::create_dir(sandbox.store_dir()).expect("create store dir");
        fs::create_dir(sandbox.home_dir()).expect("create home dir");
        fs::write(sandbox.log_path(), "").expect("create call log");
        fs::write(sandbox.config_path(), "log = \"panic\"\n").expect("write config");

        sandbox.install("git", GIT_SCRIPT);
        sandbox.install("sudo", SUDO_SCRIPT);
        sandbox.install("makepkg", MAKEPKG_SCRIPT);
        sandbox.install("pacman", PACMAN_SCRIPT);
        sandbox
    }

    fn install(&self, name: &str, script: &str) {
        let path = self.bin_dir().join(name);
        fs::write(&path, script).expect("write fake tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("make fake tool executable");
    }

    /// Directory of fake tools.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Base directory for working copies.
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    /// Home directory handed to the binary.
    pub fn home_dir(&self) -> PathBuf {
        self.root.join("home")
    }

    /// Config file passed with `--config`.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    fn log_path(&self) -> PathBuf {
        self.root.join("calls.log")
    }

    /// Working copy path for `package`.
    pub fn working_copy(&self, package: &str) -> PathBuf {
        self.store_dir().join(package)
    }

    /// Lines recorded by the fake tools, in call order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .expect("read call log")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// A command for the binary with a clean environment pointing at the
    /// sandbox. `PATH` holds only the fake tools and stdin is closed.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_aur-builder"));
        command
            .env_clear()
            .env("PATH", self.bin_dir())
            .env("HOME", self.home_dir())
            .env("FAKE_LOG", self.log_path())
            .current_dir(&self.root)
            .stdin(Stdio::null());
        command
    }

    /// Runs `build <package>` with the sandbox config and store.
    pub fn build(&self, package: &str) -> Output {
        self.build_with(package, |_| {})
    }

    /// Runs `build <package>` after letting `tweak` adjust the command.
    pub fn build_with(&self, package: &str, tweak: impl FnOnce(&mut Command)) -> Output {
        let mut command = self.command();
        command
            .arg("--config")
            .arg(self.config_path())
            .arg("build")
            .arg("--basepath")
            .arg(self.store_dir())
            .arg(package);
        tweak(&mut command);
        command.output().expect("failed to run aur-builder")
    }
}

/// Lossy UTF-8 view of a captured stream.
pub fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Asserts that `path` exists and is a directory.
pub fn assert_dir(path: &Path) {
    assert!(path.is_dir(), "expected directory at {}", path.display());
}
