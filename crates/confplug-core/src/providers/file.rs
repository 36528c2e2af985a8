//! File-backed providers
//!
//! A file provider resolves its data source relative to a starting
//! directory (`cfg-resource-directory`, default: the directory of the
//! running executable) and leaves reading and decoding to a [`FileFormat`].

use std::env;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use super::lifecycle::{initialize, DataSource, ProviderContext, ProviderLifecycle};
use super::traits::ConfigProvider;
use crate::error::{BoxError, ResolutionResult};
use crate::settings::{keys, SettingsExt};

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(|| {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
});

/// Directory of the running executable, `.` if it cannot be determined
pub fn default_base_directory() -> &'static Path {
    &BASE_DIRECTORY
}

/// A data source that names a file under a starting directory
#[derive(Debug, Clone)]
pub struct FileDataSource {
    source: DataSource,
    directory_key: String,
}

impl FileDataSource {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            directory_key: keys::RESOURCE_DIRECTORY.to_string(),
        }
    }

    /// Read the starting directory from a different settings key
    pub fn with_directory_key(mut self, key: impl Into<String>) -> Self {
        self.directory_key = key.into();
        self
    }

    pub fn data_source(&self) -> &DataSource {
        &self.source
    }

    pub fn directory_key(&self) -> &str {
        &self.directory_key
    }

    /// Directory that relative data sources are resolved against
    pub fn starting_directory(&self) -> PathBuf {
        self.source
            .settings()
            .setting::<PathBuf>(&self.directory_key)
            .unwrap_or_else(|| default_base_directory().to_path_buf())
    }

    /// Full path for `source`; absolute sources are used as-is
    pub fn resolve_path(&self, source: &str) -> PathBuf {
        self.starting_directory().join(source)
    }
}

/// How a file format opens, decodes, and releases a file
///
/// Formats are marker types; the constants describe how the factory
/// refers to them.
pub trait FileFormat: Send + Sync + 'static {
    /// Provider kind named in plugin manifests
    const KIND: &'static str;
    /// Import name used to bind a custom data-source key
    const IMPORT_NAME: &'static str;
    /// Settings key read when no data-source key is supplied
    const DEFAULT_DATA_SOURCE_KEY: &'static str;

    type Reader;

    fn open(path: &Path) -> Result<Self::Reader, BoxError>;

    fn decode<T: DeserializeOwned>(reader: &mut Self::Reader) -> Result<T, BoxError>;

    fn close(reader: Self::Reader) -> Result<(), BoxError> {
        drop(reader);
        Ok(())
    }
}

struct FileLifecycle<F> {
    source: FileDataSource,
    _format: PhantomData<fn() -> F>,
}

impl<T, F> ProviderLifecycle<T> for FileLifecycle<F>
where
    T: DeserializeOwned,
    F: FileFormat,
{
    type Connection = F::Reader;

    fn data_source(&self) -> &DataSource {
        self.source.data_source()
    }

    fn open_connection(&mut self, source: &str) -> Result<F::Reader, BoxError> {
        F::open(&self.source.resolve_path(source))
    }

    fn extract(&mut self, connection: &mut F::Reader) -> Result<T, BoxError> {
        F::decode(connection)
    }

    fn close_connection(&mut self, connection: F::Reader) -> Result<(), BoxError> {
        F::close(connection)
    }
}

/// Provider that decodes `T` from a file in format `F`
///
/// The file is read once, in [`FileConfigProvider::new`].
pub struct FileConfigProvider<T, F> {
    source: FileDataSource,
    configuration: T,
    _format: PhantomData<fn() -> F>,
}

impl<T, F> FileConfigProvider<T, F>
where
    T: DeserializeOwned,
    F: FileFormat,
{
    /// Resolve the data source and decode the configuration
    pub fn new(context: ProviderContext) -> ResolutionResult<Self> {
        let key = context.data_source_key_or(F::DEFAULT_DATA_SOURCE_KEY);
        let source = FileDataSource::new(DataSource::new(key, context.settings().clone()));

        let mut lifecycle = FileLifecycle::<F> {
            source,
            _format: PhantomData,
        };
        let configuration = initialize(&mut lifecycle, context.logger().as_ref())?;

        Ok(Self {
            source: lifecycle.source,
            configuration,
            _format: PhantomData,
        })
    }

    /// Current value of the data-source setting (re-read on every call)
    pub fn data_source(&self) -> Option<String> {
        self.source.data_source().resolve()
    }

    pub fn starting_directory(&self) -> PathBuf {
        self.source.starting_directory()
    }
}

impl<T, F> ConfigProvider<T> for FileConfigProvider<T, F>
where
    T: Send + Sync,
    F: FileFormat,
{
    fn configuration(&self) -> &T {
        &self.configuration
    }

    fn data_source_key(&self) -> &str {
        self.source.data_source().key()
    }

    fn kind(&self) -> &str {
        F::KIND
    }

    fn into_configuration(self: Box<Self>) -> T {
        self.configuration
    }
}

impl<T, F: FileFormat> std::fmt::Debug for FileConfigProvider<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("kind", &F::KIND)
            .field("data_source_key", &self.source.data_source().key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    use std::sync::Arc;

    #[test]
    fn test_starting_directory_override() {
        let settings = Arc::new(MemorySettings::new().with(keys::RESOURCE_DIRECTORY, "/srv/conf"));
        let source = FileDataSource::new(DataSource::new("k", settings));

        assert_eq!(source.starting_directory(), PathBuf::from("/srv/conf"));
        assert_eq!(source.resolve_path("app.json"), PathBuf::from("/srv/conf/app.json"));
    }

    #[test]
    fn test_starting_directory_default() {
        let source = FileDataSource::new(DataSource::new("k", Arc::new(MemorySettings::new())));
        assert_eq!(source.starting_directory(), default_base_directory());
    }

    #[test]
    fn test_custom_directory_key() {
        let settings = Arc::new(MemorySettings::new().with("my-dir", "/etc/app"));
        let source = FileDataSource::new(DataSource::new("k", settings)).with_directory_key("my-dir");

        assert_eq!(source.directory_key(), "my-dir");
        assert_eq!(source.resolve_path("a.xml"), PathBuf::from("/etc/app/a.xml"));
    }

    #[test]
    fn test_absolute_source_is_kept() {
        let settings = Arc::new(MemorySettings::new().with(keys::RESOURCE_DIRECTORY, "/srv/conf"));
        let source = FileDataSource::new(DataSource::new("k", settings));

        assert_eq!(source.resolve_path("/config/app.json"), PathBuf::from("/config/app.json"));
    }
}
