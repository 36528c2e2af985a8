//! In-memory settings store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{non_empty, SettingsStore};

/// Settings held in memory, for tests and hosts that build settings in code
///
/// # Example
///
/// ```
/// use confplug_core::settings::{MemorySettings, SettingsStore};
///
/// let settings = MemorySettings::new()
///     .with("external-configuration-json", "app.json");
/// assert_eq!(settings.get("external-configuration-json"), Some("app.json".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial values
    pub fn with_values(initial: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(initial),
        }
    }

    /// Builder-style insert
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Remove a key, returning its previous value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemorySettings {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        non_empty(self.values.read().get(key).cloned())
    }
}
