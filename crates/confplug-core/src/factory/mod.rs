//! Provider discovery and resolution
//!
//! Plugin manifests in a configured directory declare which provider kind
//! serves which contract name and model. The [`ProviderFactory`] scans them
//! once, picks the single matching export for a request, and constructs the
//! provider through its [`ProviderKind`].
//!
//! A manifest (`*.plugin.yaml` by default) looks like:
//!
//! ```yaml
//! name: formats
//! exports:
//!   - contract: json-cfg
//!     model: Settings
//!     provider: json
//!   - contract: xml-cfg
//!     provider: xml          # any model
//!     data_source_key: legacy-xml-file
//! ```
//!
//! Settings read by the factory:
//!
//! | Key | Default |
//! |-----|---------|
//! | `cfg-start-directory` | directory of the running executable |
//! | `cfg-relative-directory` | none |
//! | `cfg-search-pattern` | `*.plugin.yaml` |

mod error;
mod descriptor;
mod catalog;
mod kinds;
mod resolver;
mod timeout;

pub use descriptor::{MatchRank, PluginManifest, ProviderDescriptor};
pub use catalog::{Catalog, DiscoveryOptions, DEFAULT_SEARCH_PATTERN};
pub use kinds::{builtin_kind, builtin_kinds, ProviderConstructor, ProviderKind};
pub use resolver::ProviderFactory;
pub use timeout::resolve_with_timeout;
