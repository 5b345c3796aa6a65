//! Language identification model: bag-of-words vectorizer and multinomial
//! Naive Bayes classifier, plus the shared training and evaluation paths.

pub mod classifier;
mod error;
pub mod evaluation;
pub mod pipeline;
pub mod training;
pub mod vectorizer;

pub use classifier::{DEFAULT_SMOOTHING, ModelParameters};
pub use error::ModelError;
pub use evaluation::{EvaluationReport, evaluate, train_test_split};
pub use pipeline::TrainedModel;
pub use training::train;
pub use vectorizer::{CountVector, Vocabulary};
