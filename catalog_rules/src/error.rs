//! Errors raised while loading documents, rosters and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a document or config file from being loaded at all.
///
/// Missing fields inside an otherwise well-formed document are not errors;
/// they fall back to their defaults.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not the expected document shape at all.
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid reminder config: {0}")]
    ConfigSyntax(#[from] toml::de::Error),

    #[error("invalid reminder config: {0}")]
    InvalidConfig(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub(crate) fn read_file(path: &std::path::Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}
