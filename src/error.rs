//! Error types for configuration pipelines.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by transforms and the pipeline runner.
///
/// The runner never recovers from these: the first error aborts the run and
/// is handed back to the caller unchanged.
#[derive(Debug, Error)]
pub enum ConfabError {
    /// None of the candidate files exist.
    #[error("No config available (searched: {})", display_paths(.candidates))]
    MissingConfig {
        /// The candidate list that was searched, in order.
        candidates: Vec<PathBuf>,
    },

    /// A candidate file was found but could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A candidate file was found but its content is not a valid mapping.
    #[error("Failed to parse {format} config file {}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    /// The environment mapper was given nothing to map.
    #[error("No environment map supplied; nothing to map")]
    MissingMap,

    /// One or more required fields are absent or falsy.
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation {
        /// Missing field names, in the order they were requested.
        missing: Vec<String>,
    },

    /// A transform factory was called with unusable arguments.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// A mutation was attempted after the configuration was frozen.
    #[error("Cannot modify frozen configuration (key: {key})")]
    Frozen { key: String },
}

impl ConfabError {
    pub(crate) fn frozen(key: impl Into<String>) -> Self {
        Self::Frozen { key: key.into() }
    }

    /// Names of missing fields if this is a validation failure.
    pub fn missing_fields(&self) -> Option<&[String]> {
        match self {
            ConfabError::Validation { missing } => Some(missing),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for pipeline operations.
pub type ConfabResult<T> = std::result::Result<T, ConfabError>;
