//! Application settings lookup
//!
//! A settings store maps string keys to string values. Providers read their
//! data-source location from it and the factory reads its discovery
//! directory and search pattern from it. Stores are passed explicitly as
//! [`SharedSettings`].
//!
//! - `MemorySettings`: in-memory values
//! - `EnvSettings`: environment variables
//! - `FileSettings`: flat YAML file
//! - `ChainSettings`: ordered fallback over other stores

mod traits;
mod memory;
mod env;
mod file;
mod chain;

pub use traits::{SettingsStore, SettingsExt, SharedSettings, SettingsError, SettingsResult};
pub use memory::MemorySettings;
pub use env::EnvSettings;
pub use file::FileSettings;
pub use chain::ChainSettings;

/// Setting keys understood by the built-in providers and the factory
pub mod keys {
    /// Directory that file providers resolve their data source against
    pub const RESOURCE_DIRECTORY: &str = "cfg-resource-directory";
    /// Root directory scanned for plugin manifests
    pub const START_DIRECTORY: &str = "cfg-start-directory";
    /// Offset appended to the scan root
    pub const RELATIVE_DIRECTORY: &str = "cfg-relative-directory";
    /// File-name glob selecting plugin manifests
    pub const SEARCH_PATTERN: &str = "cfg-search-pattern";
}
