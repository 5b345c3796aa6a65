//! On-disk model artifacts.
//!
//! A model directory holds two JSON blobs:
//! - `vectorizer.json`: token rule and ordered vocabulary
//! - `model.json`: Naive Bayes parameters
//!
//! Each blob is written to a temp file in the same directory and renamed
//! into place, so readers never observe a partially written file. Both blobs
//! carry the same random `generation`; a pair whose generations differ was
//! mixed across two saves and is rejected as corrupt.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glossa_model::vectorizer::TOKEN_PATTERN;
use glossa_model::{ModelParameters, TrainedModel, Vocabulary};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::ArtifactError;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const MODEL_FILE: &str = "model.json";

#[derive(Serialize, Deserialize)]
struct VectorizerBlob {
    generation: u64,
    token_pattern: String,
    vocabulary: Vocabulary,
}

#[derive(Serialize, Deserialize)]
struct ModelBlob {
    generation: u64,
    trained_at: DateTime<Utc>,
    params: ModelParameters,
}

/// Model directory containing the vectorizer and classifier blobs.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.dir.join(VECTORIZER_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    /// Both blobs are present. Says nothing about whether they parse.
    pub fn exists(&self) -> bool {
        self.vectorizer_path().is_file() && self.model_path().is_file()
    }

    /// Persist `model`, replacing any previous artifacts.
    pub fn save(&self, model: &TrainedModel) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let generation = fastrand::u64(..);
        let vectorizer = VectorizerBlob {
            generation,
            token_pattern: TOKEN_PATTERN.to_string(),
            vocabulary: model.vocabulary().clone(),
        };
        let params = ModelBlob {
            generation,
            trained_at: Utc::now(),
            params: model.params().clone(),
        };

        self.write_atomic(&self.vectorizer_path(), &vectorizer)?;
        self.write_atomic(&self.model_path(), &params)?;

        info!(
            dir = %self.dir.display(),
            generation,
            vocabulary = model.vocabulary().len(),
            classes = model.classes().len(),
            "saved model artifacts"
        );
        Ok(())
    }

    /// Load and validate both blobs.
    pub fn load(&self) -> Result<TrainedModel, ArtifactError> {
        let vectorizer_path = self.vectorizer_path();
        let model_path = self.model_path();

        // Check both before parsing either.
        for path in [&vectorizer_path, &model_path] {
            if !path.is_file() {
                return Err(ArtifactError::Missing(path.clone()));
            }
        }

        let vectorizer: VectorizerBlob = read_json(&vectorizer_path)?;
        if vectorizer.token_pattern != TOKEN_PATTERN {
            return Err(ArtifactError::Corrupt {
                path: vectorizer_path,
                reason: format!(
                    "token pattern {:?} does not match {:?}",
                    vectorizer.token_pattern, TOKEN_PATTERN
                ),
            });
        }

        let blob: ModelBlob = read_json(&model_path)?;
        if blob.generation != vectorizer.generation {
            return Err(ArtifactError::Corrupt {
                path: model_path,
                reason: format!(
                    "generation {} does not match vectorizer generation {}",
                    blob.generation, vectorizer.generation
                ),
            });
        }

        let corrupt = |e: glossa_model::ModelError| ArtifactError::Corrupt {
            path: model_path.clone(),
            reason: e.to_string(),
        };
        blob.params.validate().map_err(corrupt)?;
        let model = TrainedModel::new(vectorizer.vocabulary, blob.params).map_err(corrupt)?;

        info!(
            dir = %self.dir.display(),
            vocabulary = model.vocabulary().len(),
            classes = model.classes().len(),
            trained_at = %blob.trained_at,
            "loaded model artifacts"
        );
        Ok(model)
    }

    fn write_atomic<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), ArtifactError> {
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        let temp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, value)
                .map_err(|e| serialize_error(path, e))?;
            writer.flush().map_err(io_err)?;
        }
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), "wrote artifact");
        Ok(())
    }
}

/// Keep the path on I/O failures surfaced through serde_json.
fn serialize_error(path: &Path, e: serde_json::Error) -> ArtifactError {
    if e.is_io() {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source: e.into(),
        }
    } else {
        ArtifactError::Serialize(e)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
