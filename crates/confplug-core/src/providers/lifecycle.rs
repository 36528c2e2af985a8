//! Provider lifecycle: open, extract, close
//!
//! Every provider acquires its configuration through [`initialize`], which
//! runs the three steps of a [`ProviderLifecycle`] in order and turns any
//! failure into a single [`ResolutionError`].

use std::sync::Arc;

use thiserror::Error;

use crate::error::{BoxError, ResolutionError, ResolutionResult};
use crate::logging::{Logger, NoOpLogger, SharedLogger};
use crate::settings::SharedSettings;
use crate::{log_debug, log_warn};

/// Placeholder used in messages when the data-source setting is missing
pub const UNSET_DATA_SOURCE: &str = "<unset>";

/// Inputs handed to a provider constructor
#[derive(Clone)]
pub struct ProviderContext {
    settings: SharedSettings,
    data_source_key: Option<String>,
    logger: SharedLogger,
}

impl ProviderContext {
    /// Create a context that uses the provider's default data-source key
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            data_source_key: None,
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Override the settings key holding the data-source location
    pub fn with_data_source_key(mut self, key: impl Into<String>) -> Self {
        self.data_source_key = Some(key.into());
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    pub fn data_source_key(&self) -> Option<&str> {
        self.data_source_key.as_deref()
    }

    /// The configured key, or `default` when none was supplied
    pub fn data_source_key_or(&self, default: &str) -> String {
        self.data_source_key
            .clone()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }
}

impl std::fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderContext")
            .field("settings", &self.settings.name())
            .field("data_source_key", &self.data_source_key)
            .finish()
    }
}

/// A data-source key bound to the settings it is looked up in
///
/// The location is not cached: every [`DataSource::resolve`] re-reads the
/// store.
#[derive(Clone)]
pub struct DataSource {
    key: String,
    settings: SharedSettings,
}

impl DataSource {
    pub fn new(key: impl Into<String>, settings: SharedSettings) -> Self {
        Self {
            key: key.into(),
            settings,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Current location stored under the key
    pub fn resolve(&self) -> Option<String> {
        self.settings.get(&self.key)
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("key", &self.key)
            .field("settings", &self.settings.name())
            .finish()
    }
}

/// Raised when the data-source key has no value in the settings
#[derive(Error, Debug)]
#[error("setting '{key}' holding the data source location is not set")]
pub struct UnsetDataSource {
    pub key: String,
}

/// The three steps a provider implements to acquire its configuration
///
/// A connection returned by `open_connection` is always handed back to
/// `close_connection`, whether extraction succeeded or not.
pub trait ProviderLifecycle<T> {
    /// Session state between open and close (a reader, a handle, ...)
    type Connection;

    /// Where the location of the data is looked up
    fn data_source(&self) -> &DataSource;

    /// Establish a session for reading `source`
    fn open_connection(&mut self, source: &str) -> Result<Self::Connection, BoxError>;

    /// Decode the configuration from an open session
    fn extract(&mut self, connection: &mut Self::Connection) -> Result<T, BoxError>;

    /// Release the session
    fn close_connection(&mut self, connection: Self::Connection) -> Result<(), BoxError>;
}

/// Run a provider's lifecycle and return the decoded configuration
///
/// Failures are wrapped exactly once, with the data-source value in the
/// message and the original error kept as the cause. If both extraction
/// and close fail, the extraction error is reported and the close error is
/// logged.
pub fn initialize<T, L>(lifecycle: &mut L, logger: &dyn Logger) -> ResolutionResult<T>
where
    L: ProviderLifecycle<T> + ?Sized,
{
    let key = lifecycle.data_source().key().to_string();
    let source = match lifecycle.data_source().resolve() {
        Some(source) => source,
        None => {
            return Err(retrieval_error(UNSET_DATA_SOURCE, UnsetDataSource { key }));
        }
    };

    log_debug!(logger, "Opening data source {} (key '{}')", source, key);
    let mut connection = lifecycle
        .open_connection(&source)
        .map_err(|e| retrieval_error(&source, e))?;

    let extracted = lifecycle.extract(&mut connection);
    let closed = lifecycle.close_connection(connection);

    match (extracted, closed) {
        (Ok(value), Ok(())) => {
            log_debug!(logger, "Loaded configuration from {}", source);
            Ok(value)
        }
        (Ok(_), Err(close_err)) => Err(retrieval_error(&source, close_err)),
        (Err(extract_err), Ok(())) => Err(retrieval_error(&source, extract_err)),
        (Err(extract_err), Err(close_err)) => {
            log_warn!(logger, "Failed to close data source {}: {}", source, close_err);
            Err(retrieval_error(&source, extract_err))
        }
    }
}

fn retrieval_error(source: &str, cause: impl Into<BoxError>) -> ResolutionError {
    let cause = cause.into();
    ResolutionError::with_cause(
        format!(
            "Error retrieving configuration from data source {}. Reason: {}",
            source, cause
        ),
        cause,
    )
}
