//! Building a working copy with `makepkg`.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, Invocation, StdioMode, run_checked};
use camino::Utf8Path;
use std::io::Write;
use tracing::{error, info};

/// `makepkg` flag that installs missing dependencies with pacman.
pub const SYNC_DEPS_FLAG: &str = "-s";

/// Runs `makepkg` inside working copies.
pub struct BuildInvoker<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> BuildInvoker<'a> {
    /// Creates a build invoker.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// Runs `makepkg -s` with `working_copy` as its working directory.
    ///
    /// Writes `pwd: <working_copy>` to `status` first.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Build`] when `makepkg` cannot be started or
    /// exits unsuccessfully.
    pub fn build(&self, working_copy: &Utf8Path, status: &mut dyn Write) -> Result<()> {
        info!(subcommand = "build", pwd = %working_copy, "Show build pwd");
        writeln!(status, "pwd: {working_copy}")?;

        let invocation = Invocation::new("makepkg")
            .args([SYNC_DEPS_FLAG])
            .current_dir(working_copy)
            .stdio(StdioMode::Inherit);

        run_checked(self.executor, &invocation, |message| BuilderError::Build {
            repo: working_copy.to_owned(),
            message,
        })
        .map(drop)
        .inspect_err(|err| {
            error!(subcommand = "build", pwd = %working_copy, error = %err, "Makepkg failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
    use camino::Utf8PathBuf;

    fn makepkg_call(dir: &str, result: Result<std::process::Output>) -> ExpectedCall {
        ExpectedCall {
            cmd: "makepkg",
            args: vec!["-s"],
            current_dir: Some(Utf8PathBuf::from(dir)),
            result,
        }
    }

    #[test]
    fn runs_makepkg_in_the_working_copy() {
        let executor = StubExecutor::new(vec![makepkg_call("/srv/store/foo", Ok(success_output()))]);
        let mut status = Vec::new();

        BuildInvoker::new(&executor)
            .build(Utf8Path::new("/srv/store/foo"), &mut status)
            .expect("expected build to succeed");

        executor.assert_finished();
        let received = executor.received();
        let call = received.first().expect("one invocation");
        assert_eq!(call.working_dir(), Some(Utf8Path::new("/srv/store/foo")));
        assert_eq!(call.stdio_mode(), StdioMode::Inherit);

        let status = String::from_utf8(status).expect("status UTF-8");
        assert_eq!(status, "pwd: /srv/store/foo\n");
    }

    #[test]
    fn failure_is_reported_as_build_error() {
        let executor = StubExecutor::new(vec![makepkg_call(
            "/srv/store/foo",
            Ok(failure_output("==> ERROR: Could not resolve all dependencies.")),
        )]);

        let err = BuildInvoker::new(&executor)
            .build(Utf8Path::new("/srv/store/foo"), &mut Vec::new())
            .expect_err("expected build failure");

        assert!(matches!(
            err,
            BuilderError::Build { ref repo, ref message }
                if repo.as_str() == "/srv/store/foo" && message.contains("resolve all dependencies")
        ));
        assert!(!err.is_recoverable());
    }
}
