//! Load the persisted model, or train and persist a new one.

use std::path::PathBuf;
use std::time::Instant;

use glossa_model::{DEFAULT_SMOOTHING, TrainedModel, train};
use glossa_store::ArtifactStore;
use tracing::{error, info, warn};

use crate::BootstrapError;
use crate::source::CorpusSource;

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Directory holding `vectorizer.json` and `model.json`.
    pub model_dir: PathBuf,
    /// Laplace smoothing used when training is needed.
    pub smoothing: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// How the model was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Loaded,
    Trained,
}

/// Load artifacts from `store`; on any artifact error, train once from
/// `source` and write a fresh artifact pair.
///
/// A failure to write the new artifacts is logged, not returned: the freshly
/// trained model is still served.
pub async fn load_or_train(
    store: &ArtifactStore,
    source: &dyn CorpusSource,
    smoothing: f64,
) -> Result<(TrainedModel, Origin), BootstrapError> {
    let load_store = store.clone();
    let loaded = tokio::task::spawn_blocking(move || load_store.load())
        .await
        .map_err(|e| BootstrapError::Task(e.to_string()))?;

    match loaded {
        Ok(model) => return Ok((model, Origin::Loaded)),
        Err(e) if e.is_recoverable() => {
            info!(dir = %store.dir().display(), reason = %e, "no usable model artifacts; training");
        }
        Err(e) => {
            warn!(dir = %store.dir().display(), error = %e, "could not read model artifacts; training");
        }
    }

    let model = train_from(source, smoothing).await?;

    let save_store = store.clone();
    let model = tokio::task::spawn_blocking(move || {
        if let Err(e) = save_store.save(&model) {
            error!(dir = %save_store.dir().display(), error = %e, "failed to persist trained model");
        }
        model
    })
    .await
    .map_err(|e| BootstrapError::Task(e.to_string()))?;

    Ok((model, Origin::Trained))
}

/// Fetch the corpus and run the shared training path on the blocking pool.
pub async fn train_from(
    source: &dyn CorpusSource,
    smoothing: f64,
) -> Result<TrainedModel, BootstrapError> {
    let start = Instant::now();
    let corpus = source.load().await?;
    info!(source = %source.describe(), rows = corpus.len(), "loaded training corpus");

    let model = tokio::task::spawn_blocking(move || train(&corpus, smoothing))
        .await
        .map_err(|e| BootstrapError::Task(e.to_string()))??;

    info!(elapsed_ms = start.elapsed().as_millis() as u64, "bootstrap training complete");
    Ok(model)
}
