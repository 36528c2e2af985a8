//! Discovery failures
//!
//! These never leave the crate: the factory wraps them into a
//! `ResolutionError` at its boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::ResolutionError;

#[derive(Error, Debug)]
pub(crate) enum DiscoveryError {
    #[error("invalid search pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot read plugin directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read plugin manifest {}: {source}", .path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid plugin manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no provider is exported for contract {contract} and model {model} ({available} descriptors discovered)")]
    NoMatch {
        contract: String,
        model: String,
        available: usize,
    },

    #[error("{count} providers are exported for contract {contract} and model {model}: {candidates}")]
    Ambiguous {
        contract: String,
        model: String,
        count: usize,
        candidates: String,
    },

    #[error("unknown provider kind '{0}'")]
    UnknownKind(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

pub(crate) type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Render an optional contract name for messages
pub(crate) fn contract_label(contract: Option<&str>) -> String {
    match contract {
        Some(name) => format!("'{}'", name),
        None => "<none>".to_string(),
    }
}
