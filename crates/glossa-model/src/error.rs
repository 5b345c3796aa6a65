use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("training corpus is empty")]
    EmptyCorpus,

    #[error("got {vectors} count vectors but {labels} labels")]
    LengthMismatch { vectors: usize, labels: usize },

    #[error("vocabulary is empty: corpus contains no tokens")]
    EmptyVocabulary,

    #[error("count vector has {found} dimensions, model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("smoothing must be positive and finite, got {0}")]
    InvalidSmoothing(f64),

    #[error("test fraction must leave both splits non-empty, got {0}")]
    InvalidSplit(f64),

    #[error("duplicate vocabulary token: {0:?}")]
    DuplicateToken(String),

    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),
}
