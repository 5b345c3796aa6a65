pub mod api;
pub mod corpus;
pub mod types;

pub use api::{DetectRequest, DetectResponse, ErrorResponse};
pub use corpus::{CorpusColumns, DEFAULT_CORPUS_URL};
pub use types::{Prediction, TrainingExample};
