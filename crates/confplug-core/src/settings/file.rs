//! File-based settings store (YAML)
//!
//! The file holds a flat mapping of keys to scalar values:
//!
//! ```yaml
//! cfg-start-directory: /opt/app/plugins
//! cfg-search-pattern: "*.plugin.yaml"
//! external-configuration-json: app.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_yaml::Value;

use super::traits::{non_empty, SettingsError, SettingsResult, SettingsStore};

/// Settings loaded from a YAML file
///
/// Values are read once and cached; call [`FileSettings::reload`] to pick up
/// changes. A missing file behaves like an empty store.
pub struct FileSettings {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileSettings {
    /// Load settings from `path`
    pub fn open(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let values = load(&path)?;
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Re-read the file, replacing the cached values
    pub fn reload(&self) -> SettingsResult<()> {
        let values = load(&self.path)?;
        *self.values.write() = values;
        Ok(())
    }
}

fn load(path: &Path) -> SettingsResult<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let document: Value = serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(HashMap::new()),
        _ => return Err(SettingsError::NotAMapping(path.to_path_buf())),
    };

    let mut values = HashMap::new();
    for (key, value) in mapping {
        if let (Some(key), Some(value)) = (scalar_to_string(&key), scalar_to_string(&value)) {
            values.insert(key, value);
        }
    }
    Ok(values)
}

/// Render a YAML scalar as the string a settings lookup returns
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl std::fmt::Debug for FileSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSettings")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .field("keys", &self.values.read().len())
            .finish()
    }
}

impl SettingsStore for FileSettings {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        non_empty(self.values.read().get(key).cloned())
    }
}
