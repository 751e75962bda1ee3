//! Shared test utilities for the builder crate.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, Invocation};
use camino::Utf8PathBuf;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn stdout_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "git").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The working directory the command must run in.
    pub current_dir: Option<Utf8PathBuf>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Replays expected command invocations in order and returns predefined
/// results, so tests can verify command sequencing without side effects.
/// Mismatched invocations are reported as [`BuilderError::StubMismatch`].
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    received: RefCell<Vec<Invocation>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            received: RefCell::new(Vec::new()),
        }
    }

    /// Returns every invocation seen so far, in order.
    #[must_use]
    pub fn received(&self) -> Vec<Invocation> {
        self.received.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        let remaining = self.expected.borrow();
        assert!(
            remaining.is_empty(),
            "expected no further command invocations, {} left: {:?}",
            remaining.len(),
            remaining.iter().map(|call| call.cmd).collect::<Vec<_>>()
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, invocation: &Invocation) -> Result<Output> {
        self.received.borrow_mut().push(invocation.clone());

        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(BuilderError::StubMismatch {
                message: format!("unexpected invocation: {}", invocation.display()),
            });
        };

        let args_match = call.args.len() == invocation.arg_list().len()
            && call
                .args
                .iter()
                .zip(invocation.arg_list())
                .all(|(expected, actual)| expected == actual);

        if call.cmd != invocation.program()
            || !args_match
            || call.current_dir.as_deref() != invocation.working_dir()
        {
            return Err(BuilderError::StubMismatch {
                message: format!(
                    "expected `{} {}` in {:?}, got `{}` in {:?}",
                    call.cmd,
                    call.args.join(" "),
                    call.current_dir,
                    invocation.display(),
                    invocation.working_dir()
                ),
            });
        }

        call.result
    }
}

/// Wraps a [`StubExecutor`] and creates the target directory when a scripted
/// `git clone` succeeds, mimicking git's side effect.
#[derive(Debug)]
pub struct CloningExecutor {
    /// The scripted executor that decides each call's result.
    pub stub: StubExecutor,
}

impl CommandExecutor for CloningExecutor {
    fn run(&self, invocation: &Invocation) -> Result<Output> {
        let output = self.stub.run(invocation)?;
        let is_clone = invocation.arg_list().first().is_some_and(|arg| arg == "clone");
        if is_clone && output.status.success() {
            if let Some(target) = invocation.arg_list().last() {
                std::fs::create_dir_all(target)?;
            }
        }
        Ok(output)
    }
}

/// Leaks `value` so runtime paths can be used in [`ExpectedCall::args`].
#[must_use]
pub fn leak_str(value: &str) -> &'static str {
    Box::leak(value.to_owned().into_boxed_str())
}
