//! Provider factory: discovery plus contract-based resolution

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::catalog::{Catalog, DiscoveryOptions};
use super::descriptor::ProviderDescriptor;
use super::error::{contract_label, DiscoveryError, DiscoveryResult};
use super::kinds::{KindRegistry, ProviderKind};
use crate::error::{ResolutionError, ResolutionResult};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::providers::{ConfigModel, ConfigProvider, ProviderContext};
use crate::settings::SharedSettings;
use crate::{log_debug, log_error, log_info};

/// Resolves configuration providers by contract name and model
///
/// The catalog is built on first use from the plugin directory named in the
/// settings and reused until [`ProviderFactory::invalidate`] is called. A
/// failed build is not cached. Every failure is reported as a single
/// [`ResolutionError`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use serde::Deserialize;
/// use confplug_core::{ConfigModel, ProviderFactory};
/// use confplug_core::settings::FileSettings;
///
/// #[derive(Deserialize)]
/// struct Settings { name: String }
/// impl ConfigModel for Settings { const MODEL_NAME: &'static str = "Settings"; }
///
/// let settings = Arc::new(FileSettings::open("app.settings.yaml").unwrap());
/// let factory = ProviderFactory::new(settings);
///
/// let provider = factory.resolve::<Settings>(Some("json-cfg")).unwrap();
/// println!("{}", provider.configuration().name);
/// ```
pub struct ProviderFactory {
    settings: SharedSettings,
    logger: SharedLogger,
    catalog: RwLock<Option<Arc<Catalog>>>,
    registered: RwLock<Vec<ProviderDescriptor>>,
    kinds: KindRegistry,
    bindings: RwLock<HashMap<String, String>>,
}

impl ProviderFactory {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            logger: Arc::new(NoOpLogger::new()),
            catalog: RwLock::new(None),
            registered: RwLock::new(Vec::new()),
            kinds: KindRegistry::default(),
            bindings: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Options of the cached catalog, or the ones the next build would use
    pub fn discovery_options(&self) -> DiscoveryOptions {
        match self.catalog.read().as_ref() {
            Some(catalog) => catalog.options().clone(),
            None => DiscoveryOptions::from_settings(self.settings.as_ref()),
        }
    }

    /// Add a descriptor alongside the discovered ones
    ///
    /// Registered descriptors come after every scanned one in the catalog.
    pub fn register_descriptor(&self, descriptor: ProviderDescriptor) {
        self.registered.write().push(descriptor);
        self.invalidate();
    }

    /// Make a provider kind available for model `M`
    pub fn register_kind<M: ConfigModel>(&self, kind: ProviderKind<M>) {
        log_debug!(self.logger, "Registered provider kind '{}' for {}", kind.name(), M::MODEL_NAME);
        self.kinds.register(kind);
    }

    /// Names of the kinds registered through [`ProviderFactory::register_kind`]
    pub fn registered_kinds(&self) -> Vec<String> {
        self.kinds.registered_names()
    }

    /// Bind the data-source key injected into kinds with this import name
    ///
    /// Takes precedence over a descriptor's `data_source_key` and over the
    /// kind's default key.
    pub fn bind_data_source_key(&self, import_name: impl Into<String>, key: impl Into<String>) {
        self.bindings.write().insert(import_name.into(), key.into());
    }

    /// Drop the cached catalog; the next resolution rescans
    pub fn invalidate(&self) {
        *self.catalog.write() = None;
    }

    /// The catalog, building it if needed
    pub fn catalog(&self) -> ResolutionResult<Arc<Catalog>> {
        let options = self.discovery_options();
        self.load_catalog(&options).map_err(|err| self.boundary_error(&options, "ConfigProvider<*>", None, err))
    }

    /// Resolve the provider exported for `(contract_name, M)`
    pub fn resolve<M: ConfigModel>(&self, contract_name: Option<&str>) -> ResolutionResult<Box<dyn ConfigProvider<M>>> {
        let options = self.discovery_options();
        self.try_resolve::<M>(&options, contract_name).map_err(|err| {
            let provider_type = format!("ConfigProvider<{}>", M::MODEL_NAME);
            self.boundary_error(&options, &provider_type, contract_name, err)
        })
    }

    /// Resolve and keep only the configuration value
    pub fn resolve_configuration<M: ConfigModel>(&self, contract_name: Option<&str>) -> ResolutionResult<M> {
        self.resolve::<M>(contract_name).map(|provider| provider.into_configuration())
    }

    fn try_resolve<M: ConfigModel>(
        &self,
        options: &DiscoveryOptions,
        contract_name: Option<&str>,
    ) -> DiscoveryResult<Box<dyn ConfigProvider<M>>> {
        let catalog = self.load_catalog(options)?;
        let descriptor = catalog.select(contract_name, M::MODEL_NAME)?;
        log_debug!(self.logger, "Selected {} for {}", descriptor, M::MODEL_NAME);

        let kind = self
            .kinds
            .lookup::<M>(&descriptor.provider)
            .ok_or_else(|| DiscoveryError::UnknownKind(descriptor.provider.clone()))?;

        let key = self.data_source_key_for(&kind, descriptor);
        let context = ProviderContext::new(self.settings.clone())
            .with_data_source_key(key)
            .with_logger(self.logger.clone());

        Ok(kind.construct(context)?)
    }

    fn data_source_key_for<M: ConfigModel>(&self, kind: &ProviderKind<M>, descriptor: &ProviderDescriptor) -> String {
        let bound = kind
            .import_name()
            .and_then(|import_name| self.bindings.read().get(import_name).cloned());

        bound
            .or_else(|| descriptor.data_source_key.clone())
            .unwrap_or_else(|| kind.default_data_source_key().to_string())
    }

    fn load_catalog(&self, options: &DiscoveryOptions) -> DiscoveryResult<Arc<Catalog>> {
        if let Some(catalog) = self.catalog.read().as_ref() {
            return Ok(catalog.clone());
        }

        let mut slot = self.catalog.write();
        if let Some(catalog) = slot.as_ref() {
            return Ok(catalog.clone());
        }

        let mut catalog = Catalog::scan(options, self.logger.as_ref())?;
        catalog.extend(self.registered.read().iter().cloned());
        log_info!(
            self.logger,
            "Built provider catalog from {}: {} descriptors",
            options.directory.display(),
            catalog.len()
        );

        let catalog = Arc::new(catalog);
        *slot = Some(catalog.clone());
        Ok(catalog)
    }

    /// Turn an internal failure into the one error callers see
    ///
    /// A `ResolutionError` raised by a provider passes through unchanged.
    fn boundary_error(
        &self,
        options: &DiscoveryOptions,
        provider_type: &str,
        contract_name: Option<&str>,
        err: DiscoveryError,
    ) -> ResolutionError {
        let err = match err {
            DiscoveryError::Resolution(inner) => {
                log_error!(self.logger, "{}", inner);
                return inner;
            }
            other => other,
        };

        let wrapped = ResolutionError::with_cause(
            format!(
                "Error resolving configuration provider. Provider type: {}. Directory: {}. \
                 Search pattern: {}. Contract name: {}. Reason: {}",
                provider_type,
                options.directory.display(),
                options.pattern,
                contract_label(contract_name),
                err
            ),
            err,
        );
        log_error!(self.logger, "{}", wrapped);
        wrapped
    }
}

impl std::fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFactory")
            .field("settings", &self.settings.name())
            .field("catalog_built", &self.catalog.read().is_some())
            .field("registered_descriptors", &self.registered.read().len())
            .field("registered_kinds", &self.kinds.registered_names())
            .finish()
    }
}
