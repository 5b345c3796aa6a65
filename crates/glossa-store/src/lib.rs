//! Storage layer: model artifacts on disk and the labelled training corpus.

mod error;
pub use error::{ArtifactError, CorpusError};

pub mod artifact;
pub mod corpus;
#[cfg(feature = "http")]
pub mod remote;

pub use artifact::ArtifactStore;
pub use corpus::{is_url, read_csv, read_csv_file};
#[cfg(feature = "http")]
pub use remote::CorpusClient;
