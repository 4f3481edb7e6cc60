// src/config/mod.rs

//! Configuration of the production [`ShellSpawner`](crate::exec::ShellSpawner).
//!
//! Priority for each setting:
//! 1. an explicit [`ShellConfig`] passed to `ShellSpawner::with_config`
//! 2. `SHELLTEST_SHELL` / `SHELLTEST_SHELL_FLAG` environment variables
//! 3. defaults (`sh` / `-c`)

pub mod validate;

/// Environment variable overriding the shell program.
pub const SHELL_ENV_VAR: &str = "SHELLTEST_SHELL";

/// Environment variable overriding the flag that precedes the command.
pub const SHELL_FLAG_ENV_VAR: &str = "SHELLTEST_SHELL_FLAG";

/// Which shell runs the command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub program: String,
    pub flag: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            flag: "-c".to_string(),
        }
    }
}

impl ShellConfig {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    /// Defaults overridden by `SHELLTEST_SHELL` / `SHELLTEST_SHELL_FLAG`.
    ///
    /// Values are taken verbatim; run [`ShellConfig::validate`] before use.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ShellConfig::from_env`] but reading variables through
    /// `lookup`, so callers (and tests) need not mutate the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            program: lookup(SHELL_ENV_VAR).unwrap_or(defaults.program),
            flag: lookup(SHELL_FLAG_ENV_VAR).unwrap_or(defaults.flag),
        }
    }
}
