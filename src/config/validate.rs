// src/config/validate.rs

use crate::config::ShellConfig;
use crate::errors::{Result, ShellTestError};

impl ShellConfig {
    /// Basic sanity checks before the config is used to spawn anything.
    pub fn validate(&self) -> Result<()> {
        ensure_non_empty("shell program", &self.program)?;
        ensure_non_empty("shell flag", &self.flag)?;
        Ok(())
    }
}

fn ensure_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShellTestError::Config(format!("{what} must not be empty")));
    }
    Ok(())
}
