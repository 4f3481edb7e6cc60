// src/lib.rs

//! Declaratively run a shell command once and assert on its exit code,
//! stdout and stderr.
//!
//! The pieces:
//! - [`builder`]: the fluent [`CommandExpectation`] and its two completion
//!   modes (`end` / `end_with`)
//! - [`expect`]: expectation records and their evaluation
//! - [`exec`]: the [`Spawner`] seam and the production [`ShellSpawner`]
//! - [`config`]: which shell `ShellSpawner` runs
//! - [`logging`]: optional `tracing` subscriber setup

pub mod builder;
pub mod config;
pub mod errors;
pub mod exec;
pub mod expect;
pub mod logging;
pub mod types;

pub use builder::CommandExpectation;
pub use config::ShellConfig;
pub use errors::{AssertionError, Failure, ProcessError, Result, ShellTestError};
pub use exec::{ProcessReport, ShellSpawner, SpawnOptions, Spawner};
pub use expect::{Expectation, Matcher};
pub use types::Stream;

/// Fresh [`CommandExpectation`] backed by the system shell.
pub fn shelltest() -> CommandExpectation {
    CommandExpectation::new()
}
