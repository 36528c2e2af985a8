//! Plugin discovery
//!
//! A catalog is built by listing one directory (not recursively), keeping
//! the files whose name matches the search pattern, and reading each one as
//! a [`PluginManifest`]. Manifests are visited in file-name order and their
//! exports keep the order they are written in, so the catalog is the same
//! for the same directory contents.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use super::descriptor::{MatchRank, PluginManifest, ProviderDescriptor};
use super::error::{contract_label, DiscoveryError, DiscoveryResult};
use crate::logging::Logger;
use crate::providers::default_base_directory;
use crate::settings::{keys, SettingsExt, SettingsStore};
use crate::{log_debug, log_warn};

/// Default file-name glob for plugin manifests
pub const DEFAULT_SEARCH_PATTERN: &str = "*.plugin.yaml";

/// Where and what to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub directory: PathBuf,
    pub pattern: String,
}

impl DiscoveryOptions {
    pub fn new(directory: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            pattern: pattern.into(),
        }
    }

    /// Read `cfg-start-directory`, `cfg-relative-directory`, and
    /// `cfg-search-pattern`
    pub fn from_settings(settings: &dyn SettingsStore) -> Self {
        let start = settings
            .setting::<PathBuf>(keys::START_DIRECTORY)
            .unwrap_or_else(|| default_base_directory().to_path_buf());
        let directory = match settings.setting::<PathBuf>(keys::RELATIVE_DIRECTORY) {
            Some(offset) => start.join(offset),
            None => start,
        };
        let pattern = settings
            .setting::<String>(keys::SEARCH_PATTERN)
            .unwrap_or_else(|| DEFAULT_SEARCH_PATTERN.to_string());

        Self { directory, pattern }
    }
}

/// Discovered provider descriptors
#[derive(Debug, Clone)]
pub struct Catalog {
    options: DiscoveryOptions,
    modules: Vec<PathBuf>,
    descriptors: Vec<ProviderDescriptor>,
}

impl Catalog {
    /// Scan `options.directory` for manifests matching `options.pattern`
    pub(crate) fn scan(options: &DiscoveryOptions, logger: &dyn Logger) -> DiscoveryResult<Self> {
        let pattern = Pattern::new(&options.pattern).map_err(|source| DiscoveryError::Pattern {
            pattern: options.pattern.clone(),
            source,
        })?;

        let entries = fs::read_dir(&options.directory).map_err(|source| DiscoveryError::Directory {
            path: options.directory.clone(),
            source,
        })?;

        let mut modules = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DiscoveryError::Directory {
                path: options.directory.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if pattern.matches(name) => modules.push(path),
                Some(_) => {}
                None => log_warn!(logger, "Skipping non UTF-8 file name {}", path.display()),
            }
        }
        modules.sort();

        let mut descriptors = Vec::new();
        for module in &modules {
            let manifest = read_manifest(module)?;
            if manifest.exports.is_empty() {
                log_debug!(logger, "Plugin manifest {} exports no providers", module.display());
            }
            descriptors.extend(manifest.exports.into_iter().map(|d| d.with_origin(module)));
        }

        log_debug!(
            logger,
            "Scanned {} with pattern '{}': {} manifests, {} descriptors",
            options.directory.display(),
            options.pattern,
            modules.len(),
            descriptors.len()
        );

        Ok(Self {
            options: options.clone(),
            modules,
            descriptors,
        })
    }

    /// Options the catalog was built with
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Manifest files that were read, in scan order
    pub fn modules(&self) -> &[PathBuf] {
        &self.modules
    }

    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn extend(&mut self, extra: impl IntoIterator<Item = ProviderDescriptor>) {
        self.descriptors.extend(extra);
    }

    /// Pick the single descriptor for `(contract, model)`
    ///
    /// Exports naming the model outrank open ones. The best rank present
    /// must hold exactly one descriptor, otherwise the lookup is ambiguous.
    pub(crate) fn select(&self, contract: Option<&str>, model: &str) -> DiscoveryResult<&ProviderDescriptor> {
        let candidates: Vec<(MatchRank, &ProviderDescriptor)> = self
            .descriptors
            .iter()
            .filter(|d| d.matches_contract(contract))
            .filter_map(|d| d.model_rank(model).map(|rank| (rank, d)))
            .collect();

        let best = match candidates.iter().map(|(rank, _)| *rank).max() {
            Some(best) => best,
            None => {
                return Err(DiscoveryError::NoMatch {
                    contract: contract_label(contract),
                    model: model.to_string(),
                    available: self.descriptors.len(),
                });
            }
        };

        let winners: Vec<&ProviderDescriptor> = candidates
            .into_iter()
            .filter(|(rank, _)| *rank == best)
            .map(|(_, d)| d)
            .collect();

        match winners.as_slice() {
            [single] => Ok(*single),
            many => Err(DiscoveryError::Ambiguous {
                contract: contract_label(contract),
                model: model.to_string(),
                count: many.len(),
                candidates: many
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }
}

fn read_manifest(path: &Path) -> DiscoveryResult<PluginManifest> {
    let content = fs::read_to_string(path).map_err(|source| DiscoveryError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(PluginManifest::default());
    }
    serde_yaml::from_str(&content).map_err(|source| DiscoveryError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::settings::MemorySettings;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_options_from_settings() {
        let settings = MemorySettings::new()
            .with(keys::START_DIRECTORY, "/opt/app")
            .with(keys::RELATIVE_DIRECTORY, "plugins")
            .with(keys::SEARCH_PATTERN, "*.yml");

        let options = DiscoveryOptions::from_settings(&settings);
        assert_eq!(options.directory, PathBuf::from("/opt/app/plugins"));
        assert_eq!(options.pattern, "*.yml");
    }

    #[test]
    fn test_options_trim_whitespace() {
        let settings = MemorySettings::new()
            .with(keys::START_DIRECTORY, " /opt/app ")
            .with(keys::RELATIVE_DIRECTORY, "plugins \n")
            .with(keys::SEARCH_PATTERN, " *.yml");

        let options = DiscoveryOptions::from_settings(&settings);
        assert_eq!(options.directory, PathBuf::from("/opt/app/plugins"));
        assert_eq!(options.pattern, "*.yml");
    }

    #[test]
    fn test_options_defaults() {
        let options = DiscoveryOptions::from_settings(&MemorySettings::new());
        assert_eq!(options.directory, default_base_directory());
        assert_eq!(options.pattern, DEFAULT_SEARCH_PATTERN);
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.plugin.yaml", "exports:\n  - provider: xml\n    contract: b\n");
        write(dir.path(), "a.plugin.yaml", "exports:\n  - provider: json\n    contract: a1\n  - provider: json\n    contract: a2\n");
        write(dir.path(), "notes.yaml", "exports:\n  - provider: json\n    contract: ignored\n");
        fs::create_dir(dir.path().join("nested.plugin.yaml")).unwrap();

        let options = DiscoveryOptions::new(dir.path(), DEFAULT_SEARCH_PATTERN);
        let catalog = Catalog::scan(&options, &NoOpLogger).unwrap();

        assert_eq!(catalog.modules().len(), 2);
        let contracts: Vec<_> = catalog
            .descriptors()
            .iter()
            .map(|d| d.contract.as_deref().unwrap())
            .collect();
        assert_eq!(contracts, vec!["a1", "a2", "b"]);
        assert_eq!(
            catalog.descriptors()[0].origin.as_deref(),
            Some(dir.path().join("a.plugin.yaml").as_path())
        );
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write(&dir.path().join("sub"), "deep.plugin.yaml", "exports:\n  - provider: json\n");

        let catalog = Catalog::scan(&DiscoveryOptions::new(dir.path(), DEFAULT_SEARCH_PATTERN), &NoOpLogger).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.modules().is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let options = DiscoveryOptions::new(dir.path().join("absent"), DEFAULT_SEARCH_PATTERN);

        let err = Catalog::scan(&options, &NoOpLogger).unwrap_err();
        assert!(matches!(err, DiscoveryError::Directory { .. }));
    }

    #[test]
    fn test_scan_invalid_pattern() {
        let dir = tempdir().unwrap();
        let options = DiscoveryOptions::new(dir.path(), "[unclosed");

        let err = Catalog::scan(&options, &NoOpLogger).unwrap_err();
        assert!(matches!(err, DiscoveryError::Pattern { .. }));
    }

    #[test]
    fn test_scan_invalid_manifest() {
        let dir = tempdir().unwrap();
        write(dir.path(), "bad.plugin.yaml", "exports: [ { provider: json ");

        let err = Catalog::scan(&DiscoveryOptions::new(dir.path(), DEFAULT_SEARCH_PATTERN), &NoOpLogger).unwrap_err();
        assert!(matches!(err, DiscoveryError::Manifest { .. }));
    }

    #[test]
    fn test_scan_rejects_misspelled_key() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "typo.plugin.yaml",
            "exports:\n  - contrct: json-cfg\n    model: Settings\n    provider: json\n",
        );

        let err = Catalog::scan(&DiscoveryOptions::new(dir.path(), DEFAULT_SEARCH_PATTERN), &NoOpLogger).unwrap_err();
        assert!(matches!(err, DiscoveryError::Manifest { .. }));
        assert!(err.to_string().contains("typo.plugin.yaml"));
    }

    #[test]
    fn test_empty_manifest_is_allowed() {
        let dir = tempdir().unwrap();
        write(dir.path(), "empty.plugin.yaml", "");

        let catalog = Catalog::scan(&DiscoveryOptions::new(dir.path(), DEFAULT_SEARCH_PATTERN), &NoOpLogger).unwrap();
        assert_eq!(catalog.modules().len(), 1);
        assert!(catalog.is_empty());
    }

    fn catalog_of(descriptors: Vec<ProviderDescriptor>) -> Catalog {
        Catalog {
            options: DiscoveryOptions::new("/plugins", DEFAULT_SEARCH_PATTERN),
            modules: Vec::new(),
            descriptors,
        }
    }

    #[test]
    fn test_select_exact_beats_open() {
        let catalog = catalog_of(vec![
            ProviderDescriptor::new("yaml").with_contract("cfg"),
            ProviderDescriptor::new("json").with_contract("cfg").for_model("Settings"),
        ]);

        assert_eq!(catalog.select(Some("cfg"), "Settings").unwrap().provider, "json");
        assert_eq!(catalog.select(Some("cfg"), "Other").unwrap().provider, "yaml");
    }

    #[test]
    fn test_select_no_match() {
        let catalog = catalog_of(vec![ProviderDescriptor::new("json").with_contract("json-cfg")]);

        assert!(matches!(
            catalog.select(Some("xml-cfg"), "Settings"),
            Err(DiscoveryError::NoMatch { available: 1, .. })
        ));
        assert!(matches!(
            catalog.select(None, "Settings"),
            Err(DiscoveryError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_select_ambiguous() {
        let catalog = catalog_of(vec![
            ProviderDescriptor::new("json").with_contract("cfg").for_model("Settings"),
            ProviderDescriptor::new("xml").with_contract("cfg").for_model("Settings"),
        ]);

        match catalog.select(Some("cfg"), "Settings") {
            Err(DiscoveryError::Ambiguous { count, candidates, .. }) => {
                assert_eq!(count, 2);
                assert!(candidates.contains("json provider"));
                assert!(candidates.contains("xml provider"));
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }
}
