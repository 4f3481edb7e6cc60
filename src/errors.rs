// src/errors.rs

//! Crate-wide error types and aliases.

use thiserror::Error;

use crate::types::Stream;

/// Errors surfaced by [`CommandExpectation::end`](crate::CommandExpectation::end)
/// and friends.
#[derive(Error, Debug)]
pub enum ShellTestError {
    /// `end` was called without a (non-empty) command.
    #[error(".end called before command set")]
    CommandNotSet,

    /// One of the registered expectations did not hold.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Invalid spawner configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShellTestError>;

/// A failed expectation. Only the first failing expectation of a run is
/// ever reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    #[error("Expected exit code of {expected} got {actual}")]
    ExitCode { expected: i32, actual: i32 },

    /// A pattern matcher did not match. `pattern` is rendered `/like this/`.
    #[error("Expected {stream} to match /{pattern}/ got {actual}")]
    StreamMismatch {
        stream: Stream,
        pattern: String,
        actual: String,
    },

    #[error("Expected {stream} to equal {expected} got {actual}")]
    StreamNotEqual {
        stream: Stream,
        expected: String,
        actual: String,
    },
}

/// Raw error reported by a [`Spawner`](crate::exec::Spawner) when the
/// command did not exit cleanly with code 0.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (exit code {code}){}", termination_suffix(.signal, .killed))]
pub struct ProcessError {
    /// Exit code, or `-1` when the process produced none (killed by a
    /// signal, timed out, or never spawned).
    pub code: i32,
    /// Terminating signal, when known.
    pub signal: Option<i32>,
    /// Whether the spawner killed the process because its timeout elapsed.
    pub killed: bool,
    pub message: String,
}

impl ProcessError {
    /// Error for a command that exited on its own with a non-zero `code`.
    pub fn exited(command: &str, code: i32) -> Self {
        Self {
            code,
            signal: None,
            killed: false,
            message: format!("Command failed: {command}"),
        }
    }
}

fn termination_suffix(signal: &Option<i32>, killed: &bool) -> String {
    let mut suffix = String::new();
    if let Some(signal) = signal {
        suffix.push_str(&format!(" (signal {signal})"));
    }
    if *killed {
        suffix.push_str(" (killed after timeout)");
    }
    suffix
}

/// What the callback passed to
/// [`end_with`](crate::CommandExpectation::end_with) receives as its first
/// argument when something went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The first expectation that did not hold.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// All expectations held, but the spawner reported a process error.
    #[error(transparent)]
    Process(#[from] ProcessError),
}
