//! Column layout of the labelled training corpus.

/// Public multilingual dataset the detector is trained on by default.
pub const DEFAULT_CORPUS_URL: &str =
    "https://raw.githubusercontent.com/amankharwal/Website-data/master/dataset.csv";

/// Header of the free-text column.
pub const TEXT_COLUMN: &str = "Text";

/// Header of the language label column.
pub const LABEL_COLUMN: &str = "language";

/// Which CSV columns hold the text and the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusColumns {
    pub text: String,
    pub label: String,
}

impl Default for CorpusColumns {
    fn default() -> Self {
        Self {
            text: TEXT_COLUMN.to_string(),
            label: LABEL_COLUMN.to_string(),
        }
    }
}
