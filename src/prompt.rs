//! Yes/no confirmation prompts.
//!
//! The prompt keeps asking until it reads a recognised answer, an empty line,
//! or hits a read failure. There is no retry limit unless one is configured
//! with [`ConfirmationPrompt::with_max_attempts`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::num::NonZeroUsize;
use thiserror::Error;

const AFFIRMATIVE: [&str; 5] = ["y", "Y", "yes", "Yes", "YES"];
const NEGATIVE: [&str; 5] = ["n", "N", "no", "No", "NO"];

/// Notice written after an unrecognised answer.
pub const NOT_UNDERSTOOD: &str = "Answer not understood, repeating.";

/// A prompt that could not produce an answer.
///
/// Carries the default answer so callers can fall back to it.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Reading the answer failed, including end of input.
    #[error("could not read answer")]
    Read {
        /// The answer to fall back to.
        default: bool,
        /// The underlying read error.
        #[source]
        source: io::Error,
    },

    /// The configured number of attempts was used up.
    #[error("no recognised answer after {attempts} attempts")]
    AttemptsExhausted {
        /// The answer to fall back to.
        default: bool,
        /// How many answers were read.
        attempts: usize,
    },
}

impl PromptError {
    /// The default answer supplied to the failed prompt.
    #[must_use]
    pub fn default_answer(&self) -> bool {
        match self {
            Self::Read { default, .. } | Self::AttemptsExhausted { default, .. } => *default,
        }
    }
}

/// Asks a yes/no question.
pub trait Confirm {
    /// Prints `message` and returns the user's answer.
    ///
    /// # Errors
    ///
    /// Returns a [`PromptError`] carrying `default` when no answer could be
    /// read.
    fn ask(&mut self, message: &str, default: bool) -> Result<bool, PromptError>;
}

/// Line-based prompt over any reader and writer.
#[derive(Debug)]
pub struct ConfirmationPrompt<R, W> {
    input: R,
    output: W,
    max_attempts: Option<NonZeroUsize>,
}

impl<R: BufRead, W: Write> ConfirmationPrompt<R, W> {
    /// Creates a prompt with unbounded retries.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// Gives up after `attempts` unrecognised answers.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: NonZeroUsize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Consumes the prompt and returns the output writer.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input while waiting for an answer",
            ));
        }
        Ok(line.trim().to_owned())
    }
}

impl<R: Read, W: Write> ConfirmationPrompt<BufReader<R>, W> {
    /// Creates a prompt that reads `input` one byte at a time.
    ///
    /// Nothing past the answer's newline is consumed, so the rest of `input`
    /// stays available to whoever reads it next.
    #[must_use]
    pub fn unbuffered(input: R, output: W) -> Self {
        Self::new(BufReader::with_capacity(1, input), output)
    }
}

impl ConfirmationPrompt<BufReader<File>, io::Stdout> {
    /// Prompt bound to the process's stdin and stdout.
    ///
    /// Reads a duplicate of the stdin descriptor without buffering, so piped
    /// input meant for later child processes (the editor, `makepkg`) is left
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the stdin descriptor cannot be duplicated.
    pub fn stdio() -> io::Result<Self> {
        Ok(Self::unbuffered(duplicate_stdin()?, io::stdout()))
    }
}

#[cfg(unix)]
fn duplicate_stdin() -> io::Result<File> {
    use std::os::fd::AsFd;
    Ok(File::from(io::stdin().as_fd().try_clone_to_owned()?))
}

#[cfg(windows)]
fn duplicate_stdin() -> io::Result<File> {
    use std::os::windows::io::AsHandle;
    Ok(File::from(io::stdin().as_handle().try_clone_to_owned()?))
}

impl<R: BufRead, W: Write> Confirm for ConfirmationPrompt<R, W> {
    fn ask(&mut self, message: &str, default: bool) -> Result<bool, PromptError> {
        let read_error = |source| PromptError::Read { default, source };
        let mut attempts = 0_usize;

        loop {
            writeln!(self.output, "{message}").map_err(read_error)?;
            self.output.flush().map_err(read_error)?;

            let answer = self.read_answer().map_err(read_error)?;
            attempts += 1;

            if AFFIRMATIVE.contains(&answer.as_str()) {
                return Ok(true);
            }
            if NEGATIVE.contains(&answer.as_str()) {
                return Ok(false);
            }
            if answer.is_empty() {
                return Ok(default);
            }

            writeln!(self.output, "{NOT_UNDERSTOOD}").map_err(read_error)?;

            if self
                .max_attempts
                .is_some_and(|limit| attempts >= limit.get())
            {
                return Err(PromptError::AttemptsExhausted { default, attempts });
            }
        }
    }
}
