//! HTTP download of a corpus CSV.

use glossa_core::{CorpusColumns, TrainingExample};
use tracing::info;

use crate::CorpusError;
use crate::corpus::read_csv;

/// Fetches corpus CSVs over HTTP(S).
#[derive(Clone, Default)]
pub struct CorpusClient {
    client: reqwest::Client,
}

impl CorpusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Download the raw CSV body at `url`.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, CorpusError> {
        let unavailable = |reason: String| CorpusError::Unavailable {
            location: url.to_string(),
            reason,
        };

        info!(url, "fetching corpus");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(unavailable(format!("server returned {status}: {}", snippet(&body))));
        }

        let bytes = resp.bytes().await.map_err(|e| unavailable(e.to_string()))?;
        info!(url, bytes = bytes.len(), "fetched corpus");
        Ok(bytes.to_vec())
    }

    /// Download and parse the corpus at `url`.
    pub async fn fetch_corpus(
        &self,
        url: &str,
        columns: &CorpusColumns,
    ) -> Result<Vec<TrainingExample>, CorpusError> {
        let bytes = self.fetch(url).await?;
        read_csv(&bytes, columns)
    }
}

/// First line of an error body, capped for log output.
fn snippet(body: &str) -> &str {
    let line = body.lines().next().unwrap_or_default();
    match line.char_indices().nth(200) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_keeps_first_line() {
        assert_eq!(snippet("Not Found\n<html>..."), "Not Found");
        assert_eq!(snippet(""), "");
    }

    #[test]
    fn snippet_caps_long_lines() {
        let long = "é".repeat(500);
        assert_eq!(snippet(&long).chars().count(), 200);
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let client = CorpusClient::new();
        // Port 9 (discard) on loopback is closed in test environments.
        let err = client
            .fetch_corpus("http://127.0.0.1:9/dataset.csv", &CorpusColumns::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Unavailable { .. }), "{err:?}");
    }
}
