//! Labelled corpus ingestion from CSV.
//!
//! The CSV is read through arrow's reader with every column typed as UTF-8,
//! then the text and label columns are pulled out row by row. Rows with a
//! null or blank field are skipped.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, StringArray};
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use glossa_core::{CorpusColumns, TrainingExample};
use tracing::{info, warn};

use crate::CorpusError;

const BATCH_SIZE: usize = 8192;

/// Whether `location` names a remote corpus rather than a local file.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read a corpus CSV from a local file.
pub fn read_csv_file(
    path: &Path,
    columns: &CorpusColumns,
) -> Result<Vec<TrainingExample>, CorpusError> {
    let bytes = std::fs::read(path).map_err(|e| CorpusError::Unavailable {
        location: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let corpus = read_csv(&bytes, columns)?;
    info!(path = %path.display(), rows = corpus.len(), "read corpus file");
    Ok(corpus)
}

/// Parse an in-memory corpus CSV with a header row.
pub fn read_csv(bytes: &[u8], columns: &CorpusColumns) -> Result<Vec<TrainingExample>, CorpusError> {
    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(bytes, None)?;

    // Read every column as text; the label column may look numeric.
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Schema::new(fields);

    let text_idx = schema
        .index_of(&columns.text)
        .map_err(|_| CorpusError::MissingColumn(columns.text.clone()))?;
    let label_idx = schema
        .index_of(&columns.label)
        .map_err(|_| CorpusError::MissingColumn(columns.label.clone()))?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(bytes)?;

    let mut corpus = Vec::new();
    let mut skipped = 0usize;
    for batch in reader {
        let batch = batch?;
        skipped += extract_rows(&batch, text_idx, label_idx, &mut corpus);
    }

    if skipped > 0 {
        warn!(skipped, "skipped corpus rows with missing text or label");
    }
    if corpus.is_empty() {
        return Err(CorpusError::Empty);
    }
    Ok(corpus)
}

/// Append labelled rows from `batch`; returns how many rows were skipped.
fn extract_rows(
    batch: &RecordBatch,
    text_idx: usize,
    label_idx: usize,
    out: &mut Vec<TrainingExample>,
) -> usize {
    let text_col = batch.column(text_idx);
    let label_col = batch.column(label_idx);

    let mut skipped = 0;
    for row in 0..batch.num_rows() {
        let text = get_string(text_col.as_ref(), row);
        let label = get_string(label_col.as_ref(), row);
        match (text, label) {
            (Some(text), Some(label)) if !text.trim().is_empty() && !label.trim().is_empty() => {
                out.push(TrainingExample::new(text, label.trim()));
            }
            _ => skipped += 1,
        }
    }
    skipped
}

/// String value at `row`; every corpus column is read as Utf8.
fn get_string(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|arr| arr.value(row).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> CorpusColumns {
        CorpusColumns::default()
    }

    #[test]
    fn reads_text_and_label_columns() {
        let csv = "Text,language\n\
                   \"Hello, world\",English\n\
                   Bonjour le monde,French\n";
        let corpus = read_csv(csv.as_bytes(), &cols()).unwrap();
        assert_eq!(
            corpus,
            vec![
                TrainingExample::new("Hello, world", "English"),
                TrainingExample::new("Bonjour le monde", "French"),
            ]
        );
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let csv = "id,language,Text\n1,Spanish,Hola amigo\n2,German,Guten Tag\n";
        let corpus = read_csv(csv.as_bytes(), &cols()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].language, "Spanish");
        assert_eq!(corpus[1].text, "Guten Tag");
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let csv = "Text,language\n\"first line\nsecond line\",English\n";
        let corpus = read_csv(csv.as_bytes(), &cols()).unwrap();
        assert_eq!(corpus[0].text, "first line\nsecond line");
    }

    #[test]
    fn numeric_looking_labels_stay_text() {
        let csv = "Text,language\nfoo bar,1\nbaz qux,2\n";
        let corpus = read_csv(csv.as_bytes(), &cols()).unwrap();
        assert_eq!(corpus[1].language, "2");
    }

    #[test]
    fn rows_missing_a_field_are_skipped() {
        let csv = "Text,language\nhello there,English\n,French\nhola,\n";
        let corpus = read_csv(csv.as_bytes(), &cols()).unwrap();
        assert_eq!(corpus, vec![TrainingExample::new("hello there", "English")]);
    }

    #[test]
    fn custom_column_names() {
        let csv = "sentence,lang\nciao,Italian\n";
        let columns = CorpusColumns {
            text: "sentence".into(),
            label: "lang".into(),
        };
        let corpus = read_csv(csv.as_bytes(), &columns).unwrap();
        assert_eq!(corpus[0], TrainingExample::new("ciao", "Italian"));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Text,lang\nhello,English\n";
        let err = read_csv(csv.as_bytes(), &cols()).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn(c) if c == "language"));
    }

    #[test]
    fn header_only_is_empty() {
        let err = read_csv(b"Text,language\n", &cols()).unwrap_err();
        assert!(matches!(err, CorpusError::Empty));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = read_csv_file(&tmp.path().join("absent.csv"), &cols()).unwrap_err();
        assert!(matches!(err, CorpusError::Unavailable { .. }));
    }

    #[test]
    fn reads_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("corpus.csv");
        std::fs::write(&path, "Text,language\nHallo Welt,German\n").unwrap();
        let corpus = read_csv_file(&path, &cols()).unwrap();
        assert_eq!(corpus, vec![TrainingExample::new("Hallo Welt", "German")]);
    }

    #[test]
    fn get_string_reads_utf8_only() {
        let strings = StringArray::from(vec![Some("hola"), None]);
        assert_eq!(get_string(&strings, 0).as_deref(), Some("hola"));
        assert_eq!(get_string(&strings, 1), None);

        let numbers = arrow::array::Int32Array::from(vec![7]);
        assert_eq!(get_string(&numbers, 0), None);
    }

    #[test]
    fn url_detection() {
        assert!(is_url("https://example.com/data.csv"));
        assert!(is_url("http://localhost:8000/data.csv"));
        assert!(!is_url("data/dataset.csv"));
        assert!(!is_url("/tmp/https.csv"));
    }
}
