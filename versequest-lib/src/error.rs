//! Error types for versequest

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for versequest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in versequest operations
#[derive(Error, Debug)]
pub enum Error {
    /// Edition identifier is not one of the supported editions
    #[error("unsupported edition: {0}")]
    UnsupportedEdition(String),

    /// The edition's backing document does not exist
    #[error("corpus not found for edition '{edition}': {}", .path.display())]
    CorpusNotFound { edition: String, path: PathBuf },

    /// The edition's document exists but is not a valid verse list
    #[error("malformed corpus for edition '{edition}': {reason}")]
    CorpusMalformed { edition: String, reason: String },

    /// Failed to load or run the embedding model
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Failed to read or write persisted vectors
    #[error("store error: {0}")]
    Store(String),

    /// Requested verse, book or chapter does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(edition: impl ToString, reason: impl Into<String>) -> Self {
        Self::CorpusMalformed {
            edition: edition.to_string(),
            reason: reason.into(),
        }
    }
}
