//! Catalog entries and plugin manifests

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One provider exported by a plugin
///
/// In a manifest:
///
/// ```yaml
/// exports:
///   - contract: json-cfg
///     model: Settings
///     provider: json
///     data_source_key: settings-file
/// ```
///
/// `model` may be omitted, in which case the export matches every model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderDescriptor {
    /// Optional contract name used to tell providers for the same model apart
    #[serde(default)]
    pub contract: Option<String>,
    /// `ConfigModel::MODEL_NAME` this export was built for
    #[serde(default)]
    pub model: Option<String>,
    /// Provider kind that constructs the instance ("json", "xml", ...)
    pub provider: String,
    /// Settings key overriding the kind's default data-source key
    #[serde(default)]
    pub data_source_key: Option<String>,
    /// Manifest the descriptor was read from, `None` when registered in code
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

/// How well a descriptor's model matches a requested model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    /// Export without a model, usable for any model
    Open,
    /// Export naming the requested model
    Exact,
}

impl ProviderDescriptor {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            contract: None,
            model: None,
            provider: provider.into(),
            data_source_key: None,
            origin: None,
        }
    }

    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    pub fn for_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_data_source_key(mut self, key: impl Into<String>) -> Self {
        self.data_source_key = Some(key.into());
        self
    }

    pub(crate) fn with_origin(mut self, origin: &Path) -> Self {
        self.origin = Some(origin.to_path_buf());
        self
    }

    /// Contract names compare exactly; `None` only matches unnamed exports
    pub fn matches_contract(&self, contract: Option<&str>) -> bool {
        self.contract.as_deref() == contract
    }

    /// Rank of this export for `model`, `None` if it does not apply
    pub fn model_rank(&self, model: &str) -> Option<MatchRank> {
        match self.model.as_deref() {
            None => Some(MatchRank::Open),
            Some(name) if name == model => Some(MatchRank::Exact),
            Some(_) => None,
        }
    }
}

impl fmt::Display for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} provider (contract: {}, model: {})",
            self.provider,
            self.contract.as_deref().unwrap_or("<none>"),
            self.model.as_deref().unwrap_or("*"),
        )?;
        if let Some(origin) = &self.origin {
            write!(f, " from {}", origin.display())?;
        }
        Ok(())
    }
}

/// Contents of a plugin manifest file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    /// Informational plugin name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exports: Vec<ProviderDescriptor>,
}
