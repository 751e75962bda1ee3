//! External command execution.
//!
//! Every tool the builder drives (git, pacman, the editor, makepkg, bash) is
//! run through the [`CommandExecutor`] trait. An [`Invocation`] carries its own
//! working directory, so the process working directory is never changed.

use crate::error::{BuilderError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Output, Stdio};

/// How a child process's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Attach stdin, stdout, and stderr to the controlling terminal.
    #[default]
    Inherit,
    /// Discard stdout and stderr; stdin is inherited.
    Silent,
    /// Collect stdout and stderr into the returned [`Output`].
    Capture,
}

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    current_dir: Option<Utf8PathBuf>,
    stdio: StdioMode,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use aur_builder::exec::{Invocation, StdioMode};
    ///
    /// let invocation = Invocation::new("git")
    ///     .args(["stash"])
    ///     .current_dir("/srv/store/foo")
    ///     .stdio(StdioMode::Silent);
    /// assert_eq!(invocation.program(), "git");
    /// assert_eq!(invocation.arg_list(), ["stash"]);
    /// assert_eq!(invocation.working_dir().map(|dir| dir.as_str()), Some("/srv/store/foo"));
    /// ```
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            stdio: StdioMode::default(),
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the directory the command runs in.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Sets how standard streams are wired.
    #[must_use]
    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the program.
    #[must_use]
    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    /// The working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Utf8Path> {
        self.current_dir.as_deref()
    }

    /// The stream wiring.
    #[must_use]
    pub fn stdio_mode(&self) -> StdioMode {
        self.stdio
    }

    /// Renders the command line for log output.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs the invocation to completion and returns its output.
    ///
    /// Streams that are not captured come back empty.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::CommandSpawn`] if the program cannot be started.
    fn run(&self, invocation: &Invocation) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, invocation: &Invocation) -> Result<Output> {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arg_list());

        if let Some(dir) = invocation.working_dir() {
            cmd.current_dir(dir.as_std_path());
        }

        let spawn_error = |source| BuilderError::CommandSpawn {
            program: invocation.program().to_owned(),
            source,
        };

        match invocation.stdio_mode() {
            StdioMode::Capture => cmd.output().map_err(spawn_error),
            StdioMode::Inherit => cmd.status().map(empty_output).map_err(spawn_error),
            StdioMode::Silent => cmd
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(empty_output)
                .map_err(spawn_error),
        }
    }
}

fn empty_output(status: std::process::ExitStatus) -> Output {
    Output {
        status,
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Describes why a finished command counts as a failure.
///
/// Uses the trimmed stderr when the command produced any, otherwise the exit
/// status.
#[must_use]
pub fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        output.status.to_string()
    } else {
        trimmed.to_owned()
    }
}

/// Runs an invocation and maps spawn failures and non-zero exits to one error.
///
/// `on_failure` receives the failure description.
pub(crate) fn run_checked<F>(
    executor: &dyn CommandExecutor,
    invocation: &Invocation,
    on_failure: F,
) -> Result<Output>
where
    F: FnOnce(String) -> BuilderError,
{
    let output = match executor.run(invocation) {
        Ok(output) => output,
        Err(BuilderError::CommandSpawn { source, .. }) => return Err(on_failure(source.to_string())),
        Err(err) => return Err(err),
    };

    if output.status.success() {
        Ok(output)
    } else {
        Err(on_failure(failure_message(&output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{exit_status, failure_output, success_output};

    #[test]
    fn display_joins_program_and_args() {
        let invocation = Invocation::new("sudo").args(["pacman", "-Syu", "--noconfirm"]);
        assert_eq!(invocation.display(), "sudo pacman -Syu --noconfirm");
    }

    #[test]
    fn default_stdio_is_inherit() {
        assert_eq!(Invocation::new("bash").stdio_mode(), StdioMode::Inherit);
    }

    #[test]
    fn failure_message_prefers_stderr() {
        let output = failure_output("  fatal: repository not found\n");
        assert_eq!(failure_message(&output), "fatal: repository not found");
    }

    #[test]
    fn failure_message_falls_back_to_status() {
        let output = Output {
            status: exit_status(2),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        assert!(failure_message(&output).contains('2'));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_captures_stdout() {
        let invocation = Invocation::new("/bin/sh")
            .args(["-c", "echo captured"])
            .stdio(StdioMode::Capture);
        let output = SystemCommandExecutor
            .run(&invocation)
            .expect("expected sh to run");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "captured");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_honours_working_dir() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let dir = Utf8PathBuf::try_from(temp.path().canonicalize().expect("canonicalize"))
            .expect("non-UTF8 temp path");
        let invocation = Invocation::new("/bin/sh")
            .args(["-c", "pwd -P"])
            .current_dir(dir.clone())
            .stdio(StdioMode::Capture);
        let output = SystemCommandExecutor
            .run(&invocation)
            .expect("expected sh to run");
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), dir.as_str());
    }

    #[test]
    fn system_executor_reports_missing_program() {
        let invocation = Invocation::new("aur-builder-definitely-missing-program");
        let err = SystemCommandExecutor
            .run(&invocation)
            .expect_err("expected spawn failure");
        assert!(matches!(
            err,
            BuilderError::CommandSpawn { ref program, .. }
                if program == "aur-builder-definitely-missing-program"
        ));
    }

    #[test]
    fn run_checked_maps_non_zero_exit() {
        let executor = crate::test_utils::StubExecutor::new(vec![crate::test_utils::ExpectedCall {
            cmd: "makepkg",
            args: vec!["-s"],
            current_dir: None,
            result: Ok(failure_output("missing dependency")),
        }]);
        let err = run_checked(&executor, &Invocation::new("makepkg").args(["-s"]), |message| {
            BuilderError::Build {
                repo: Utf8PathBuf::from("foo"),
                message,
            }
        })
        .expect_err("expected failure");
        assert!(matches!(err, BuilderError::Build { ref message, .. } if message == "missing dependency"));
        executor.assert_finished();
    }

    #[test]
    fn run_checked_passes_success_through() {
        let executor = crate::test_utils::StubExecutor::new(vec![crate::test_utils::ExpectedCall {
            cmd: "pacman",
            args: vec!["-Q"],
            current_dir: None,
            result: Ok(success_output()),
        }]);
        let output = run_checked(&executor, &Invocation::new("pacman").args(["-Q"]), |message| {
            BuilderError::PackageListing { message }
        })
        .expect("expected success");
        assert!(output.status.success());
        executor.assert_finished();
    }
}
