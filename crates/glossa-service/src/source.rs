//! Where the training corpus comes from.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use glossa_core::{CorpusColumns, TrainingExample};
use glossa_store::{CorpusError, is_url, read_csv};

use crate::BootstrapError;

/// A labelled corpus the bootstrap can train from.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    async fn load(&self) -> Result<Vec<TrainingExample>, CorpusError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// CSV file on local disk.
pub struct FileSource {
    path: PathBuf,
    columns: CorpusColumns,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, columns: CorpusColumns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

#[async_trait]
impl CorpusSource for FileSource {
    async fn load(&self) -> Result<Vec<TrainingExample>, CorpusError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CorpusError::Unavailable {
                location: self.describe(),
                reason: e.to_string(),
            })?;
        read_csv(&bytes, &self.columns)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// CSV served over HTTP(S).
#[cfg(feature = "http")]
pub struct UrlSource {
    url: String,
    columns: CorpusColumns,
    client: glossa_store::CorpusClient,
}

#[cfg(feature = "http")]
impl UrlSource {
    pub fn new(url: impl Into<String>, columns: CorpusColumns) -> Self {
        Self {
            url: url.into(),
            columns,
            client: glossa_store::CorpusClient::new(),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl CorpusSource for UrlSource {
    async fn load(&self) -> Result<Vec<TrainingExample>, CorpusError> {
        self.client.fetch_corpus(&self.url, &self.columns).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Corpus already held in memory.
pub struct MemorySource {
    examples: Vec<TrainingExample>,
}

impl MemorySource {
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }
}

#[async_trait]
impl CorpusSource for MemorySource {
    async fn load(&self) -> Result<Vec<TrainingExample>, CorpusError> {
        if self.examples.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(self.examples.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: {} rows>", self.examples.len())
    }
}

/// Pick a source for `location`: a URL or a local path.
pub fn source_for(
    location: &str,
    columns: CorpusColumns,
) -> Result<Arc<dyn CorpusSource>, BootstrapError> {
    if is_url(location) {
        #[cfg(feature = "http")]
        return Ok(Arc::new(UrlSource::new(location, columns)));
        #[cfg(not(feature = "http"))]
        return Err(BootstrapError::UnsupportedSource(location.to_string()));
    }
    Ok(Arc::new(FileSource::new(location, columns)))
}
