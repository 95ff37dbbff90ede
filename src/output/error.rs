//! Output error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading crawl output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Checkpoint not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Checkpoint {path} does not match its schema: {message}")]
    Validation { path: PathBuf, message: String },
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
