//! JSON request/response types for the detection endpoint.

use serde::{Deserialize, Serialize};

use crate::types::Prediction;

/// `POST /api/detect` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectRequest {
    pub text: String,
}

/// `POST /api/detect` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    pub language: String,
    pub confidence: f64,
    /// Only present when the prediction fell back to class priors.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degenerate: bool,
}

impl From<Prediction> for DetectResponse {
    fn from(p: Prediction) -> Self {
        Self {
            language: p.language,
            confidence: p.confidence,
            degenerate: p.degenerate,
        }
    }
}

/// Error body for any non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
