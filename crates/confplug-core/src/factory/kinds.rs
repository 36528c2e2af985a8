//! Provider kinds: how a catalog entry becomes a provider instance
//!
//! The built-in kinds (`json`, `xml`, `yaml`) are available for every model.
//! Hosts add formats by registering a [`ProviderKind`] on the factory; the
//! factory itself does not change.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ResolutionResult;
use crate::providers::{
    ConfigModel, ConfigProvider, FileConfigProvider, FileFormat, JsonFormat, ProviderContext,
    XmlFormat, YamlFormat,
};

/// Constructor producing a provider for model `M`
pub type ProviderConstructor<M> =
    Arc<dyn Fn(ProviderContext) -> ResolutionResult<Box<dyn ConfigProvider<M>>> + Send + Sync>;

/// A named way of constructing providers for model `M`
pub struct ProviderKind<M> {
    name: String,
    import_name: Option<String>,
    default_data_source_key: String,
    constructor: ProviderConstructor<M>,
}

impl<M: ConfigModel> ProviderKind<M> {
    /// Create a kind from a constructor
    ///
    /// # Example
    ///
    /// ```
    /// use serde::Deserialize;
    /// use confplug_core::{ConfigModel, ProviderKind, ProviderContext, ResolutionResult};
    /// use confplug_core::providers::{ConfigProvider, JsonConfigProvider};
    ///
    /// #[derive(Deserialize)]
    /// struct Settings { name: String }
    /// impl ConfigModel for Settings { const MODEL_NAME: &'static str = "Settings"; }
    ///
    /// // Reuse the JSON reader under a different kind name and default key
    /// let kind = ProviderKind::<Settings>::new("legacy-json", "legacy-settings-file", |ctx: ProviderContext| {
    ///     let provider: Box<dyn ConfigProvider<Settings>> = Box::new(JsonConfigProvider::<Settings>::new(ctx)?);
    ///     Ok(provider)
    /// });
    /// assert_eq!(kind.name(), "legacy-json");
    /// ```
    pub fn new<C>(name: impl Into<String>, default_data_source_key: impl Into<String>, constructor: C) -> Self
    where
        C: Fn(ProviderContext) -> ResolutionResult<Box<dyn ConfigProvider<M>>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            import_name: None,
            default_data_source_key: default_data_source_key.into(),
            constructor: Arc::new(constructor),
        }
    }

    /// A kind backed by a [`FileFormat`]
    pub fn from_format<F: FileFormat>() -> Self {
        Self::new(F::KIND, F::DEFAULT_DATA_SOURCE_KEY, |ctx| {
            let provider: Box<dyn ConfigProvider<M>> = Box::new(FileConfigProvider::<M, F>::new(ctx)?);
            Ok(provider)
        })
        .with_import_name(F::IMPORT_NAME)
    }

    /// Name under which a data-source key can be bound for this kind
    pub fn with_import_name(mut self, import_name: impl Into<String>) -> Self {
        self.import_name = Some(import_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn import_name(&self) -> Option<&str> {
        self.import_name.as_deref()
    }

    pub fn default_data_source_key(&self) -> &str {
        &self.default_data_source_key
    }

    /// Build a provider; the constructor runs the provider's lifecycle
    pub fn construct(&self, context: ProviderContext) -> ResolutionResult<Box<dyn ConfigProvider<M>>> {
        (self.constructor)(context)
    }
}

impl<M> std::fmt::Debug for ProviderKind<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderKind")
            .field("name", &self.name)
            .field("import_name", &self.import_name)
            .field("default_data_source_key", &self.default_data_source_key)
            .finish()
    }
}

/// Built-in kind for `name`, if there is one
pub fn builtin_kind<M: ConfigModel>(name: &str) -> Option<ProviderKind<M>> {
    match name {
        n if n == JsonFormat::KIND => Some(ProviderKind::from_format::<JsonFormat>()),
        n if n == XmlFormat::KIND => Some(ProviderKind::from_format::<XmlFormat>()),
        n if n == YamlFormat::KIND => Some(ProviderKind::from_format::<YamlFormat>()),
        _ => None,
    }
}

/// Names of the built-in kinds
pub fn builtin_kinds() -> Vec<&'static str> {
    vec![JsonFormat::KIND, XmlFormat::KIND, YamlFormat::KIND]
}

/// Host-registered kinds, keyed by kind name and model type
#[derive(Default)]
pub(crate) struct KindRegistry {
    kinds: RwLock<HashMap<(String, TypeId), Arc<dyn Any + Send + Sync>>>,
}

impl KindRegistry {
    pub(crate) fn register<M: ConfigModel>(&self, kind: ProviderKind<M>) {
        let key = (kind.name.clone(), TypeId::of::<M>());
        self.kinds.write().insert(key, Arc::new(kind));
    }

    /// Registered kind for `(name, M)`, falling back to the built-ins
    pub(crate) fn lookup<M: ConfigModel>(&self, name: &str) -> Option<Arc<ProviderKind<M>>> {
        let registered = self
            .kinds
            .read()
            .get(&(name.to_string(), TypeId::of::<M>()))
            .cloned();

        match registered {
            Some(any) => any.downcast::<ProviderKind<M>>().ok(),
            None => builtin_kind::<M>(name).map(Arc::new),
        }
    }

    pub(crate) fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.read().keys().map(|(name, _)| name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolutionError;
    use crate::settings::MemorySettings;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Model {
        #[allow(dead_code)]
        name: String,
    }

    impl ConfigModel for Model {
        const MODEL_NAME: &'static str = "Model";
    }

    #[derive(Debug, Deserialize)]
    struct OtherModel {}

    impl ConfigModel for OtherModel {
        const MODEL_NAME: &'static str = "OtherModel";
    }

    #[test]
    fn test_builtin_kinds() {
        let json = builtin_kind::<Model>("json").unwrap();
        assert_eq!(json.import_name(), Some("json-cfg"));
        assert_eq!(json.default_data_source_key(), "external-configuration-json");

        let xml = builtin_kind::<Model>("xml").unwrap();
        assert_eq!(xml.import_name(), Some("xml-cfg"));
        assert_eq!(xml.default_data_source_key(), "external-configuration-xml");

        assert!(builtin_kind::<Model>("toml").is_none());
        assert_eq!(builtin_kinds(), vec!["json", "xml", "yaml"]);
    }

    #[test]
    fn test_registered_kind_is_per_model() {
        let registry = KindRegistry::default();
        registry.register(ProviderKind::<Model>::new("broken", "unused", |_ctx| {
            Err(ResolutionError::new("always fails"))
        }));

        assert!(registry.lookup::<Model>("broken").is_some());
        assert!(registry.lookup::<OtherModel>("broken").is_none());
        assert_eq!(registry.registered_names(), vec!["broken".to_string()]);
    }

    #[test]
    fn test_registered_kind_overrides_builtin() {
        let registry = KindRegistry::default();
        registry.register(ProviderKind::<Model>::new("json", "my-json-key", |_ctx| {
            Err(ResolutionError::new("replaced"))
        }));

        let kind = registry.lookup::<Model>("json").unwrap();
        assert_eq!(kind.default_data_source_key(), "my-json-key");
        assert_eq!(kind.import_name(), None);

        let ctx = ProviderContext::new(std::sync::Arc::new(MemorySettings::new()));
        let err = kind.construct(ctx).err().expect("constructor should fail");
        assert_eq!(err.message(), "replaced");

        // Other models still get the built-in
        let builtin = registry.lookup::<OtherModel>("json").unwrap();
        assert_eq!(builtin.default_data_source_key(), "external-configuration-json");
    }
}
