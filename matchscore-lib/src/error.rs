//! Error types for matchscore

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for matchscore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matchscore operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Failed to turn text into tokens or tokens back into text
    #[error("tokenization error: {0}")]
    Tokenization(String),

    /// Failed to chunk a document
    #[error("chunking error: {0}")]
    Chunking(String),

    /// Failed to pull text out of a candidate document
    #[error("extraction error for {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// Failed to write the ranked report
    #[error("report error for {path}: {message}")]
    Report { path: PathBuf, message: String },

    /// Input file or directory not found
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem failure outside of extraction and reporting
    #[error("io error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path)
        } else {
            Error::Io { path, source }
        }
    }
}
