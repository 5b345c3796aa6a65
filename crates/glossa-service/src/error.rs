use glossa_model::ModelError;
use glossa_store::CorpusError;
use thiserror::Error;

/// The model could neither be loaded nor trained.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("training corpus unavailable: {0}")]
    Corpus(#[from] CorpusError),

    #[error("training failed: {0}")]
    Training(#[from] ModelError),

    #[error("corpus source {0:?} needs the `http` feature")]
    UnsupportedSource(String),

    #[error("bootstrap task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("model unavailable: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("inference failed: {0}")]
    Inference(#[from] ModelError),

    #[error("empty input")]
    EmptyInput,
}
