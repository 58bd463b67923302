use std::path::PathBuf;

use thiserror::Error;

/// Failures of the key-value byte store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced to the command-line user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("task {0} not found")]
    TaskNotFound(u64),

    #[error("category {0} not found")]
    CategoryNotFound(u64),

    #[error("{0}")]
    InvalidInput(String),
}
