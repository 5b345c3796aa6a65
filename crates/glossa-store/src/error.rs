use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or writing the persisted model.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {0}")]
    Missing(PathBuf),

    #[error("model artifact {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("artifact I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ArtifactError {
    /// Whether retraining can recover from this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Missing(_) | Self::Corrupt { .. })
    }
}

/// Failure obtaining the labelled training corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus unavailable at {location}: {reason}")]
    Unavailable { location: String, reason: String },

    #[error("corpus has no column {0:?}")]
    MissingColumn(String),

    #[error("corpus contains no labelled rows")]
    Empty,

    #[error("malformed corpus: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
