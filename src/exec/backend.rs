// src/exec/backend.rs

//! Pluggable spawner abstraction.
//!
//! `CommandExpectation` talks to a `Spawner` instead of a fixed process API,
//! so tests can substitute a fake that records calls and yields canned
//! output without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::errors::ProcessError;
use crate::exec::SpawnOptions;
use crate::types::Stream;

/// Boxed future returned by [`Spawner::spawn`].
pub type SpawnFuture<'a> = Pin<Box<dyn Future<Output = ProcessReport> + Send + 'a>>;

/// Launches a shell command and reports back once it has terminated.
///
/// Production code uses [`ShellSpawner`](super::ShellSpawner); tests can
/// provide their own implementation.
pub trait Spawner: Send + Sync {
    /// Run `command` with `options`.
    ///
    /// The returned future resolves exactly once, after the process has
    /// terminated. Failures to launch are reported through
    /// [`ProcessReport::error`], never by panicking.
    fn spawn<'a>(&'a self, command: &'a str, options: &'a SpawnOptions) -> SpawnFuture<'a>;
}

/// What a spawner reports on process termination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// `None` on a clean zero exit.
    pub error: Option<ProcessError>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessReport {
    /// Report for a process that exited with code 0.
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            error: None,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Report carrying a process error.
    pub fn failure(
        error: ProcessError,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Observed exit code: the error's code if one was reported, else 0.
    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map_or(0, |e| e.code)
    }

    pub fn stream(&self, stream: Stream) -> &str {
        match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        }
    }
}
