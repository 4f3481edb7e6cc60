// src/builder.rs

//! The fluent `CommandExpectation` builder.
//!
//! A builder is configured through chained calls, then consumed by exactly
//! one of:
//! - [`CommandExpectation::end`]: the first failing expectation comes back
//!   as `Err`.
//! - [`CommandExpectation::end_with`]: the outcome is handed to a callback
//!   together with the captured stdout/stderr.
//!
//! Both share [`CommandExpectation::execute`], which spawns the command and
//! evaluates the expectations once; they differ only in how the outcome is
//! dispatched.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{AssertionError, Failure, Result, ShellTestError};
use crate::exec::{ProcessReport, ShellSpawner, SpawnOptions, Spawner};
use crate::expect::{Expectation, Matcher, evaluate};
use crate::types::Stream;

/// Declarative "run this command once and check what it did".
///
/// ```no_run
/// # async fn demo() -> shelltest::Result<()> {
/// use regex::Regex;
/// use shelltest::{shelltest, Stream};
///
/// shelltest()
///     .cmd("echo hello")
///     .expect(0)
///     .expect((Stream::Stdout, Regex::new("^hel").unwrap()))
///     .end()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct CommandExpectation {
    command: Option<String>,
    options: SpawnOptions,
    expectations: Vec<Expectation>,
    /// First invalid registration, reported on completion.
    invalid: Option<String>,
    spawner: Option<Arc<dyn Spawner>>,
}

impl CommandExpectation {
    /// Fresh builder that runs commands with a [`ShellSpawner`] built from
    /// the environment.
    pub fn new() -> Self {
        Self {
            command: None,
            options: SpawnOptions::default(),
            expectations: Vec::new(),
            invalid: None,
            spawner: None,
        }
    }

    /// Fresh builder that hands commands to `spawner`.
    pub fn with_spawner(spawner: Arc<dyn Spawner>) -> Self {
        Self {
            spawner: Some(spawner),
            ..Self::new()
        }
    }

    /// Command string passed to the shell. An empty command is only
    /// rejected when the builder is completed.
    pub fn cmd(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.cwd = Some(path.into());
        self
    }

    /// Environment of the spawned process. Replaces the inherited
    /// environment entirely.
    pub fn env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.options.env = Some(vars);
        self
    }

    /// Timeout in milliseconds, passed through to the spawner.
    pub fn timeout(mut self, ms: u64) -> Self {
        self.options.timeout = Some(ms);
        self
    }

    pub fn uid(mut self, id: u32) -> Self {
        self.options.uid = Some(id);
        self
    }

    pub fn gid(mut self, id: u32) -> Self {
        self.options.gid = Some(id);
        self
    }

    /// Register an expectation.
    ///
    /// An `i32` checks the exit code; a `(Stream, matcher)` pair checks a
    /// captured stream, where `&str`/`String` compare for equality and a
    /// `Regex` must match.
    pub fn expect(mut self, expectation: impl Into<Expectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    pub fn expect_code(self, code: i32) -> Self {
        self.expect(Expectation::exit_code(code))
    }

    pub fn expect_stream(self, stream: Stream, matcher: impl Into<Matcher>) -> Self {
        self.expect(Expectation::stream(stream, matcher))
    }

    /// Stream expectation with the stream given by name, e.g.
    /// `expect_named("stdout", "hello")`. An unknown name is reported as
    /// [`ShellTestError::Config`] when the builder is completed.
    pub fn expect_named(mut self, stream: &str, matcher: impl Into<Matcher>) -> Self {
        match Expectation::named_stream(stream, matcher) {
            Ok(expectation) => self.expectations.push(expectation),
            Err(e) => {
                self.invalid.get_or_insert(e);
            }
        }
        self
    }

    pub fn expect_stdout(self, matcher: impl Into<Matcher>) -> Self {
        self.expect_stream(Stream::Stdout, matcher)
    }

    pub fn expect_stderr(self, matcher: impl Into<Matcher>) -> Self {
        self.expect_stream(Stream::Stderr, matcher)
    }

    /// Options that will be handed to the spawner.
    pub fn options(&self) -> &SpawnOptions {
        &self.options
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Run the command and check every expectation.
    ///
    /// Returns the report when all expectations hold. A non-zero exit is not
    /// an error by itself: without an exit-code expectation nothing checks it.
    ///
    /// # Errors
    ///
    /// - [`ShellTestError::CommandNotSet`] before anything is spawned if no
    ///   non-empty command was configured.
    /// - [`ShellTestError::Assertion`] with the first failing expectation.
    pub async fn end(self) -> Result<ProcessReport> {
        let (report, outcome) = self.execute().await?;
        outcome?;
        Ok(report)
    }

    /// Run the command and pass the outcome to `callback` exactly once as
    /// `(failure, stdout, stderr)`.
    ///
    /// `failure` is the first failing expectation if any; otherwise the
    /// spawner's own process error, or `None` for a clean run.
    ///
    /// # Errors
    ///
    /// Only [`ShellTestError::CommandNotSet`] (and spawner configuration
    /// errors), returned before anything is spawned. The callback is not
    /// invoked in that case.
    pub async fn end_with<F>(self, callback: F) -> Result<()>
    where
        F: FnOnce(Option<Failure>, &str, &str),
    {
        let (report, outcome) = self.execute().await?;
        let failure = match outcome {
            Err(assertion) => Some(Failure::Assertion(assertion)),
            Ok(()) => report.error.clone().map(Failure::Process),
        };
        callback(failure, &report.stdout, &report.stderr);
        Ok(())
    }

    /// Spawn the command and evaluate the expectations against its report.
    async fn execute(
        self,
    ) -> Result<(ProcessReport, std::result::Result<(), AssertionError>)> {
        let command = match self.command {
            Some(command) if !command.is_empty() => command,
            _ => return Err(ShellTestError::CommandNotSet),
        };
        if let Some(invalid) = self.invalid {
            return Err(ShellTestError::Config(invalid));
        }
        let spawner: Arc<dyn Spawner> = match self.spawner {
            Some(spawner) => spawner,
            None => Arc::new(ShellSpawner::new()?),
        };

        info!(
            cmd = %command,
            expectations = self.expectations.len(),
            options = ?self.options.keys(),
            "running command"
        );

        let report = spawner.spawn(&command, &self.options).await;
        let outcome = evaluate(&self.expectations, &report);

        match &outcome {
            Ok(()) => debug!(cmd = %command, "all expectations held"),
            Err(e) => debug!(cmd = %command, error = %e, "expectation failed"),
        }

        Ok((report, outcome))
    }
}

impl Default for CommandExpectation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExpectation")
            .field("command", &self.command)
            .field("options", &self.options)
            .field("expectations", &self.expectations)
            .field("invalid", &self.invalid)
            .field("custom_spawner", &self.spawner.is_some())
            .finish()
    }
}
