//! The one training path shared by every entry point.

use std::time::Instant;

use glossa_core::TrainingExample;
use tracing::info;

use crate::ModelError;
use crate::classifier::ModelParameters;
use crate::pipeline::TrainedModel;
use crate::vectorizer::Vocabulary;

/// Fit the vocabulary and the classifier on `corpus`.
pub fn train(corpus: &[TrainingExample], smoothing: f64) -> Result<TrainedModel, ModelError> {
    if corpus.is_empty() {
        return Err(ModelError::EmptyCorpus);
    }
    let start = Instant::now();

    let texts: Vec<&str> = corpus.iter().map(|e| e.text.as_str()).collect();
    let labels: Vec<&str> = corpus.iter().map(|e| e.language.as_str()).collect();

    let (vocabulary, vectors) = Vocabulary::fit_transform(&texts);
    if vocabulary.is_empty() {
        return Err(ModelError::EmptyVocabulary);
    }
    let params = ModelParameters::fit(&vectors, &labels, smoothing)?;

    info!(
        documents = corpus.len(),
        vocabulary = vocabulary.len(),
        classes = params.classes().len(),
        smoothing,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "trained language model"
    );

    TrainedModel::new(vocabulary, params)
}
