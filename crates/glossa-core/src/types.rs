//! Shared language-identification types.

use serde::{Deserialize, Serialize};

/// One labelled row of the training corpus.
///
/// Rows carry no identity; duplicates are allowed and count twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub language: String,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

/// Result of classifying a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label, always a member of the trained class set.
    pub language: String,
    /// Posterior probability of `language` among all classes.
    pub confidence: f64,
    /// The input had no in-vocabulary tokens, so the prediction is the
    /// prior-dominant class and `confidence` carries no evidence.
    pub degenerate: bool,
}
