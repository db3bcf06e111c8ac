//! Errors raised while loading a program model

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML model: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported model file {0} (expected .json, .yaml or .yml)")]
    UnsupportedExtension(PathBuf),
}
