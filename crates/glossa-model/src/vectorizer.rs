//! Bag-of-words vectorizer.
//!
//! Text is split into maximal runs of Unicode word characters (`\w+`),
//! case-sensitive. The vocabulary is the sorted set of every token seen in
//! the training corpus, so index assignment is deterministic across runs.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Token rule shared by vocabulary building and vectorization.
pub const TOKEN_PATTERN: &str = r"\w+";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"));

/// Split `text` into tokens, in order of appearance.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str())
}

/// Frozen token → index mapping.
///
/// Serialized as the ordered token list; deserializing rejects duplicates so
/// a loaded vocabulary is always a bijection onto `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build the vocabulary from every token in `corpus`.
    pub fn fit<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = BTreeSet::new();
        for text in corpus {
            seen.extend(tokenize(text));
        }

        let tokens: Vec<String> = seen.into_iter().map(str::to_string).collect();
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { tokens, index }
    }

    /// Rebuild a vocabulary from its ordered token list.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, ModelError> {
        let mut index = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if index.insert(token.clone(), i).is_some() {
                return Err(ModelError::DuplicateToken(token.clone()));
            }
        }
        Ok(Self { tokens, index })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Count known tokens in `text`. Unknown tokens are dropped.
    pub fn transform(&self, text: &str) -> CountVector {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in tokenize(text) {
            if let Some(i) = self.index_of(token) {
                *counts.entry(i).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, u32)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|&(i, _)| i);
        CountVector {
            dim: self.len(),
            entries,
        }
    }

    /// Fit on `corpus`, then vectorize each of its texts.
    pub fn fit_transform(corpus: &[&str]) -> (Self, Vec<CountVector>) {
        let vocab = Self::fit(corpus.iter().copied());
        let vectors = corpus.iter().map(|t| vocab.transform(t)).collect();
        (vocab, vectors)
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = ModelError;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_tokens(tokens)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.tokens
    }
}

/// Token counts over a fixed vocabulary.
///
/// Logically a dense vector of length `len()`; only non-zero dimensions are
/// stored, sorted by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountVector {
    dim: usize,
    entries: Vec<(usize, u32)>,
}

impl CountVector {
    /// All-zero vector of the given length.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn from_dense(counts: &[u32]) -> Self {
        let entries = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i, c))
            .collect();
        Self {
            dim: counts.len(),
            entries,
        }
    }

    /// Number of dimensions (the vocabulary size).
    pub fn len(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// True when no dimension has a non-zero count.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> u32 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Non-zero `(index, count)` pairs in ascending index order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Total number of counted tokens.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| u64::from(c)).sum()
    }

    pub fn to_dense(&self) -> Vec<u32> {
        let mut dense = vec![0u32; self.dim];
        for &(i, c) in &self.entries {
            dense[i] = c;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_non_word_characters() {
        let tokens: Vec<&str> = tokenize("Hello, how are you doing today?").collect();
        assert_eq!(tokens, ["Hello", "how", "are", "you", "doing", "today"]);
    }

    #[test]
    fn tokenize_keeps_unicode_words() {
        let tokens: Vec<&str> = tokenize("¿Cómo estás? Grüß dich — привет").collect();
        assert_eq!(tokens, ["Cómo", "estás", "Grüß", "dich", "привет"]);
    }

    #[test]
    fn tokenize_is_case_sensitive() {
        let vocab = Vocabulary::fit(["Hello hello"]);
        assert_eq!(vocab.len(), 2);
        assert_ne!(vocab.index_of("Hello"), vocab.index_of("hello"));
    }

    #[test]
    fn fit_assigns_sorted_indices() {
        let vocab = Vocabulary::fit(["zebra apple", "mango apple"]);
        assert_eq!(vocab.tokens(), ["apple", "mango", "zebra"]);
        assert_eq!(vocab.index_of("apple"), Some(0));
        assert_eq!(vocab.index_of("zebra"), Some(2));
        assert_eq!(vocab.token(1), Some("mango"));
        assert_eq!(vocab.index_of("kiwi"), None);
    }

    #[test]
    fn fit_is_order_independent() {
        let a = Vocabulary::fit(["one two", "three"]);
        let b = Vocabulary::fit(["three", "two one"]);
        assert_eq!(a, b);
    }

    #[test]
    fn transform_counts_repeated_tokens() {
        let vocab = Vocabulary::fit(["the cat sat on the mat"]);
        let v = vocab.transform("the the cat");
        assert_eq!(v.len(), vocab.len());
        assert_eq!(v.get(vocab.index_of("the").unwrap()), 2);
        assert_eq!(v.get(vocab.index_of("cat").unwrap()), 1);
        assert_eq!(v.get(vocab.index_of("mat").unwrap()), 0);
        assert_eq!(v.total(), 3);
    }

    #[test]
    fn transform_drops_unknown_tokens() {
        let vocab = Vocabulary::fit(["bonjour le monde"]);
        let v = vocab.transform("bonjour everybody");
        assert_eq!(v.total(), 1);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn transform_empty_and_oov_are_zero() {
        let vocab = Vocabulary::fit(["hola mundo"]);
        for text in ["", "   ", "!!!", "こんにちは"] {
            let v = vocab.transform(text);
            assert_eq!(v.len(), vocab.len(), "length for {text:?}");
            assert!(v.is_zero(), "expected all-zero vector for {text:?}");
            assert_eq!(v.to_dense(), vec![0, 0]);
        }
    }

    #[test]
    fn transform_length_always_matches_vocabulary() {
        let vocab = Vocabulary::fit(["a b c d e", "f g"]);
        for text in ["a", "a a a g", "x y z", "g f e d c b a"] {
            let v = vocab.transform(text);
            assert_eq!(v.len(), 7);
            assert_eq!(v.to_dense().len(), 7);
        }
    }

    #[test]
    fn fit_transform_matches_separate_calls() {
        let corpus = ["hallo welt", "hallo du"];
        let (vocab, vectors) = Vocabulary::fit_transform(&corpus);
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vocab.transform("hallo du"));
    }

    #[test]
    fn from_tokens_rejects_duplicates() {
        let err = Vocabulary::from_tokens(vec!["a".into(), "b".into(), "a".into()]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateToken(t) if t == "a"));
    }

    #[test]
    fn serde_uses_token_list() {
        let vocab = Vocabulary::fit(["b a"]);
        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocab);

        assert!(serde_json::from_str::<Vocabulary>(r#"["a","a"]"#).is_err());
    }

    #[test]
    fn count_vector_dense_round_trip_preserves_zeros() {
        let v = CountVector::from_dense(&[0, 3, 0, 1]);
        assert_eq!(v.len(), 4);
        assert_eq!(v.iter_nonzero().collect::<Vec<_>>(), vec![(1, 3), (3, 1)]);
        assert_eq!(v.to_dense(), vec![0, 3, 0, 1]);
        assert!(CountVector::zeros(4).is_zero());
    }
}
