//! Resolution error types
//!
//! `ResolutionError` is the only error that crosses the public boundary of
//! provider initialization and factory resolution. Lower-level failures are
//! kept as the wrapped cause so callers can still inspect them.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error used for causes and for the lifecycle steps of a provider
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error raised when a configuration value or its provider cannot be resolved
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ResolutionError {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl ResolutionError {
    /// Create an error without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error wrapping the failure that caused it
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Human-readable message, including the context added at the wrap site
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped lower-level error, if any
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Messages of this error and every error below it, outermost first
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = vec![self.message.clone()];
        let mut current = StdError::source(self);
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        chain
    }
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;
