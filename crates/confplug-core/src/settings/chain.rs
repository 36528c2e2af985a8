//! Chained settings store with fallback behavior

use std::sync::Arc;

use super::traits::SettingsStore;

/// Settings store that consults several stores in order
///
/// The first store holding a non-empty value for a key wins.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use confplug_core::settings::{ChainSettings, EnvSettings, MemorySettings, SettingsStore};
///
/// let overrides: Arc<dyn SettingsStore> =
///     Arc::new(MemorySettings::new().with("cfg-search-pattern", "*.yaml"));
/// let chain = ChainSettings::new(vec![overrides]).then(Arc::new(EnvSettings::new()));
///
/// assert_eq!(chain.get("cfg-search-pattern"), Some("*.yaml".to_string()));
/// ```
pub struct ChainSettings {
    stores: Vec<Arc<dyn SettingsStore>>,
}

impl ChainSettings {
    /// Create a chain; an empty chain resolves nothing
    pub fn new(stores: Vec<Arc<dyn SettingsStore>>) -> Self {
        Self { stores }
    }

    /// Append a store with the lowest precedence
    pub fn then(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.stores.push(store);
        self
    }

    pub fn stores(&self) -> &[Arc<dyn SettingsStore>] {
        &self.stores
    }

    /// Find which store supplies `key`
    pub fn find_store(&self, key: &str) -> Option<&Arc<dyn SettingsStore>> {
        self.stores.iter().find(|store| store.contains(key))
    }
}

impl SettingsStore for ChainSettings {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.stores.iter().find_map(|store| store.get(key))
    }
}

impl std::fmt::Debug for ChainSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.stores.iter().map(|s| s.name()).collect();
        f.debug_struct("ChainSettings").field("stores", &names).finish()
    }
}
