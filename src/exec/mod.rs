// src/exec/mod.rs

//! Process execution layer.
//!
//! The builder never launches processes itself; it hands the command and its
//! [`SpawnOptions`] to a [`Spawner`] and waits for the [`ProcessReport`].
//!
//! - [`backend`] defines the `Spawner` trait and the report types that flow
//!   back to the builder.
//! - [`options`] holds the options object passed to the spawner.
//! - [`shell`] provides `ShellSpawner`, the production implementation backed
//!   by `tokio::process::Command`. Tests can swap in a fake spawner instead.

pub mod backend;
pub mod options;
pub mod shell;

pub use backend::{ProcessReport, Spawner, SpawnFuture};
pub use options::SpawnOptions;
pub use shell::ShellSpawner;
