//! Environment variable settings store

use std::env;

use super::traits::{non_empty, SettingsStore};

/// Settings read from environment variables
///
/// Keys are mapped to variable names by upper-casing them and replacing
/// `-` and `.` with `_`, so `cfg-start-directory` is read from
/// `CFG_START_DIRECTORY`. An optional prefix is prepended to every name.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    prefix: Option<String>,
}

impl EnvSettings {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Read `<PREFIX>_<KEY>` instead of `<KEY>`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Environment variable name consulted for `key`
    pub fn var_name(&self, key: &str) -> String {
        let base: String = key
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_ascii_uppercase(), base),
            None => base,
        }
    }
}

impl SettingsStore for EnvSettings {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        non_empty(env::var(self.var_name(key)).ok())
    }
}
