//! Process-wide detector with a lazily bootstrapped, shared model.

use std::sync::Arc;

use glossa_core::Prediction;
use glossa_model::TrainedModel;
use glossa_store::ArtifactStore;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::bootstrap::{BootstrapConfig, load_or_train};
use crate::source::CorpusSource;
use crate::{BootstrapError, DetectError};

/// Language detector.
///
/// The first caller of [`model`](Self::model) or [`detect`](Self::detect)
/// runs the load-or-train bootstrap; concurrent callers wait on it instead of
/// training again. After that the model is read-only and shared via `Arc`.
/// If the bootstrap fails, the next caller tries again.
pub struct Detector {
    store: ArtifactStore,
    source: Arc<dyn CorpusSource>,
    smoothing: f64,
    model: OnceCell<Arc<TrainedModel>>,
}

impl Detector {
    pub fn new(config: BootstrapConfig, source: Arc<dyn CorpusSource>) -> Self {
        Self {
            store: ArtifactStore::new(config.model_dir),
            source,
            smoothing: config.smoothing,
            model: OnceCell::new(),
        }
    }

    /// The shared model, bootstrapping it on first use.
    pub async fn model(&self) -> Result<Arc<TrainedModel>, BootstrapError> {
        self.model
            .get_or_try_init(|| async {
                let (model, origin) =
                    load_or_train(&self.store, self.source.as_ref(), self.smoothing).await?;
                info!(
                    origin = ?origin,
                    classes = model.classes().len(),
                    vocabulary = model.vocabulary().len(),
                    "detector ready"
                );
                Ok(Arc::new(model))
            })
            .await
            .cloned()
    }

    /// Whether the model has been bootstrapped.
    pub fn is_ready(&self) -> bool {
        self.model.initialized()
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Classify `text`. Empty input is accepted and yields a degenerate
    /// prediction.
    pub async fn detect(&self, text: &str) -> Result<Prediction, DetectError> {
        let model = self.model().await?;
        let prediction = model.predict(text)?;
        debug!(
            language = %prediction.language,
            confidence = prediction.confidence,
            degenerate = prediction.degenerate,
            "detected language"
        );
        Ok(prediction)
    }

    /// Like [`detect`](Self::detect), but rejects empty or whitespace-only input.
    pub async fn detect_non_empty(&self, text: &str) -> Result<Prediction, DetectError> {
        if text.trim().is_empty() {
            return Err(DetectError::EmptyInput);
        }
        self.detect(text).await
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("model_dir", &self.store.dir())
            .field("source", &self.source.describe())
            .field("ready", &self.is_ready())
            .finish()
    }
}
