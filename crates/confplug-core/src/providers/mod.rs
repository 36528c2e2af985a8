//! Configuration providers
//!
//! A provider turns a data source into a typed configuration value. The
//! lifecycle (open, extract, close) is enforced in one place,
//! [`initialize`], and every built-in format is a thin [`FileFormat`]
//! adapter on top of [`FileConfigProvider`]:
//!
//! - `JsonConfigProvider` (`serde_json`)
//! - `XmlConfigProvider` (`quick-xml`)
//! - `YamlConfigProvider` (`serde_yaml`)

mod traits;
mod lifecycle;
mod file;
mod json;
mod xml;
mod yaml;

pub use traits::{ConfigModel, ConfigProvider};
pub use lifecycle::{
    initialize, DataSource, ProviderContext, ProviderLifecycle, UnsetDataSource,
    UNSET_DATA_SOURCE,
};
pub use file::{default_base_directory, FileConfigProvider, FileDataSource, FileFormat};
pub use json::{JsonConfigProvider, JsonFormat};
pub use xml::{XmlConfigProvider, XmlFormat};
pub use yaml::{YamlConfigProvider, YamlFormat};
