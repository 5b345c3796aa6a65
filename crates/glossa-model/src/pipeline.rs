//! Fitted vectorizer + classifier pair used for inference.

use std::collections::BTreeMap;

use glossa_core::Prediction;
use tracing::warn;

use crate::ModelError;
use crate::classifier::ModelParameters;
use crate::vectorizer::{CountVector, Vocabulary};

/// A trained language detector: frozen vocabulary plus Naive Bayes parameters.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    vocabulary: Vocabulary,
    params: ModelParameters,
}

impl TrainedModel {
    /// Pair a vocabulary with parameters fitted on it.
    pub fn new(vocabulary: Vocabulary, params: ModelParameters) -> Result<Self, ModelError> {
        if params.dim() != vocabulary.len() {
            return Err(ModelError::DimensionMismatch {
                expected: vocabulary.len(),
                found: params.dim(),
            });
        }
        Ok(Self { vocabulary, params })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn classes(&self) -> &[String] {
        self.params.classes()
    }

    pub fn vectorize(&self, text: &str) -> CountVector {
        self.vocabulary.transform(text)
    }

    /// Classify `text`.
    ///
    /// Never fails on empty or fully out-of-vocabulary input: those yield the
    /// prior-dominant class with `degenerate` set.
    pub fn predict(&self, text: &str) -> Result<Prediction, ModelError> {
        let vector = self.vectorize(text);
        let (language, confidence) = self.params.predict_with_confidence(&vector)?;
        let degenerate = vector.is_zero();
        if degenerate {
            warn!(
                language,
                chars = text.chars().count(),
                "no known tokens in input; prediction falls back to class priors"
            );
        }

        Ok(Prediction {
            language: language.to_string(),
            confidence,
            degenerate,
        })
    }

    /// Full posterior distribution for `text`.
    pub fn predict_proba(&self, text: &str) -> Result<BTreeMap<String, f64>, ModelError> {
        self.params.predict_proba(&self.vectorize(text))
    }
}
