//! Settings store trait and typed lookups

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Key/value lookup for application settings
///
/// An empty value is treated the same as a missing one.
pub trait SettingsStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Raw string value for `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Check whether `key` has a non-empty value
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Type alias for an Arc-wrapped settings store
pub type SharedSettings = Arc<dyn SettingsStore>;

/// Typed conversion on top of [`SettingsStore::get`]
///
/// # Example
///
/// ```
/// use confplug_core::settings::{MemorySettings, SettingsExt};
///
/// let settings = MemorySettings::new();
/// settings.set("retries", "3");
///
/// assert_eq!(settings.setting::<u32>("retries"), Some(3));
/// assert_eq!(settings.setting_or("timeout-secs", 30u64), 30);
/// ```
pub trait SettingsExt: SettingsStore {
    /// Value for `key` parsed as `T`; `None` when unset or unparseable
    fn setting<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|raw| raw.trim().parse().ok())
    }

    /// Value for `key` parsed as `T`, falling back to `default`
    fn setting_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.setting(key).unwrap_or(default)
    }
}

impl<S: SettingsStore + ?Sized> SettingsExt for S {}

/// Errors raised while loading a settings source
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Settings file {} must contain a mapping of keys to values", .0.display())]
    NotAMapping(PathBuf),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Normalize a raw value: empty strings count as unset
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
