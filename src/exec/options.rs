// src/exec/options.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// Options handed to a [`Spawner`](super::Spawner).
///
/// Only the options the caller explicitly configured are present; everything
/// else stays `None` and is skipped on serialization, meaning "inherit from
/// the calling process".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpawnOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    /// Full environment of the spawned process (replaces, not extends).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// Milliseconds. `0` means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
}

impl SpawnOptions {
    /// Names of the options that were set, in a fixed order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.cwd.is_some() {
            keys.push("cwd");
        }
        if self.env.is_some() {
            keys.push("env");
        }
        if self.timeout.is_some() {
            keys.push("timeout");
        }
        if self.uid.is_some() {
            keys.push("uid");
        }
        if self.gid.is_some() {
            keys.push("gid");
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}
