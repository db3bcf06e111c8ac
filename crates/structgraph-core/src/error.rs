//! Error types for the graph model and codecs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A different node is already stored under this id.
    #[error("node `{id}` already exists with different content")]
    ConflictingNode { id: String },
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown output format `{0}` (expected one of: json, csv, graphml)")]
    UnknownFormat(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("malformed input: {0}")]
    Malformed(String),

    /// The graph holds something the format cannot carry back.
    #[error("cannot encode {0}")]
    Unencodable(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
