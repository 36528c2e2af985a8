//! Confplug Core
//!
//! Typed configuration loading through pluggable providers.
//! A provider reads one data source (a JSON, XML, or YAML file named by a
//! settings key) and exposes the decoded value. The factory finds the right
//! provider for a contract name and model by scanning plugin manifests.
//!
//! ## Providers
//!
//! Use a provider directly when the format is known up front:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde::Deserialize;
//! use confplug_core::{ConfigModel, ConfigProvider, JsonConfigProvider, ProviderContext};
//! use confplug_core::settings::MemorySettings;
//!
//! #[derive(Deserialize)]
//! struct Settings { name: String }
//! impl ConfigModel for Settings { const MODEL_NAME: &'static str = "Settings"; }
//!
//! let settings = Arc::new(MemorySettings::new().with("external-configuration-json", "/etc/app.json"));
//! let provider = JsonConfigProvider::<Settings>::new(ProviderContext::new(settings))?;
//! println!("{}", provider.configuration().name);
//! # Ok::<(), confplug_core::ResolutionError>(())
//! ```
//!
//! ## Discovery
//!
//! ```rust,ignore
//! use confplug_core::ProviderFactory;
//!
//! let factory = ProviderFactory::new(settings).with_logger(logger);
//! let provider = factory.resolve::<Settings>(Some("json-cfg"))?;
//! ```

pub mod error;
pub mod logging;
pub mod settings;
pub mod providers;
pub mod factory;

// Re-export commonly used types
pub use error::{BoxError, ResolutionError, ResolutionResult};

pub use providers::{
    ConfigModel, ConfigProvider, ProviderContext, ProviderLifecycle,
    FileConfigProvider, FileFormat,
    JsonConfigProvider, XmlConfigProvider, YamlConfigProvider,
};

pub use factory::{
    ProviderFactory, ProviderKind, ProviderDescriptor, Catalog, DiscoveryOptions,
    resolve_with_timeout,
};

pub use settings::{SettingsStore, SharedSettings, MemorySettings, EnvSettings, FileSettings, ChainSettings};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, MemoryLogger};
