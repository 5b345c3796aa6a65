//! Multinomial Naive Bayes over bag-of-words count vectors.
//!
//! Each class holds a Laplace-smoothed log-likelihood per vocabulary token
//! and a log-prior. Scores stay in log space until the final softmax-style
//! normalization, so long inputs do not underflow.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::vectorizer::CountVector;

/// Default Laplace smoothing constant.
pub const DEFAULT_SMOOTHING: f64 = 1.0;

/// Tolerance for "sums to one" checks in probability space.
const SUM_TOLERANCE: f64 = 1e-6;

/// Fitted Naive Bayes parameters.
///
/// `classes` is sorted and unique; every per-class vector is indexed in the
/// same order. Instances built through [`fit`](Self::fit) or
/// [`from_parts`](Self::from_parts) always pass [`validate`](Self::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    classes: Vec<String>,
    /// Training documents per class.
    class_count: Vec<u64>,
    class_log_prior: Vec<f64>,
    /// `[class][token]` smoothed log-likelihoods.
    feature_log_prob: Vec<Vec<f64>>,
    smoothing: f64,
}

impl ModelParameters {
    /// Estimate parameters from vectorized training documents.
    pub fn fit<S: AsRef<str>>(
        vectors: &[CountVector],
        labels: &[S],
        smoothing: f64,
    ) -> Result<Self, ModelError> {
        if vectors.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        if vectors.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        if !(smoothing.is_finite() && smoothing > 0.0) {
            return Err(ModelError::InvalidSmoothing(smoothing));
        }

        let dim = vectors[0].len();
        if dim == 0 {
            return Err(ModelError::EmptyVocabulary);
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(ModelError::DimensionMismatch {
                expected: dim,
                found: bad.len(),
            });
        }

        let classes: Vec<String> = labels
            .iter()
            .map(|l| l.as_ref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let class_idx: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        // Accumulate raw token counts per class.
        let mut class_count = vec![0u64; classes.len()];
        let mut feature_count = vec![vec![0.0f64; dim]; classes.len()];
        for (vector, label) in vectors.iter().zip(labels) {
            let c = class_idx[label.as_ref()];
            class_count[c] += 1;
            for (i, n) in vector.iter_nonzero() {
                feature_count[c][i] += f64::from(n);
            }
        }

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + smoothing * dim as f64;
                // A finite smoothing can still overflow once scaled by the vocabulary.
                if !total.is_finite() {
                    return Err(ModelError::InvalidSmoothing(smoothing));
                }
                let log_total = total.ln();
                Ok(counts
                    .into_iter()
                    .map(|n| (n + smoothing).ln() - log_total)
                    .collect())
            })
            .collect::<Result<Vec<Vec<f64>>, _>>()?;

        let log_n = (vectors.len() as f64).ln();
        let class_log_prior = class_count
            .iter()
            .map(|&n| (n as f64).ln() - log_n)
            .collect();

        let params = Self {
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
            smoothing,
        };
        params.validate()?;
        Ok(params)
    }

    /// Assemble parameters directly, e.g. from a persisted artifact.
    pub fn from_parts(
        classes: Vec<String>,
        class_count: Vec<u64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
        smoothing: f64,
    ) -> Result<Self, ModelError> {
        let params = Self {
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
            smoothing,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check shape and probability invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |msg: String| Err(ModelError::InvalidParameters(msg));

        let k = self.classes.len();
        if k == 0 {
            return invalid("no classes".into());
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("classes must be sorted and unique".into());
        }
        if self.class_count.len() != k
            || self.class_log_prior.len() != k
            || self.feature_log_prob.len() != k
        {
            return invalid(format!(
                "{k} classes but {} counts, {} priors, {} likelihood rows",
                self.class_count.len(),
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            ));
        }
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(ModelError::InvalidSmoothing(self.smoothing));
        }

        let dim = self.dim();
        if dim == 0 {
            return Err(ModelError::EmptyVocabulary);
        }

        if self.class_log_prior.iter().any(|p| !p.is_finite()) {
            return invalid("non-finite class prior".into());
        }
        let prior_sum: f64 = self.class_log_prior.iter().map(|p| p.exp()).sum();
        if (prior_sum - 1.0).abs() > SUM_TOLERANCE {
            return invalid(format!("class priors sum to {prior_sum}"));
        }

        for (class, row) in self.classes.iter().zip(&self.feature_log_prob) {
            if row.len() != dim {
                return invalid(format!(
                    "class {class:?} has {} likelihoods, expected {dim}",
                    row.len()
                ));
            }
            if row.iter().any(|p| !p.is_finite()) {
                return invalid(format!("class {class:?} has a non-finite likelihood"));
            }
            let sum: f64 = row.iter().map(|p| p.exp()).sum();
            if (sum - 1.0).abs() > SUM_TOLERANCE {
                return invalid(format!("class {class:?} likelihoods sum to {sum}"));
            }
        }

        Ok(())
    }

    /// Sorted class labels.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Training documents seen per class, aligned with [`classes`](Self::classes).
    pub fn class_count(&self) -> &[u64] {
        &self.class_count
    }

    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Log-likelihood row for class index `class`.
    pub fn feature_log_prob(&self, class: usize) -> Option<&[f64]> {
        self.feature_log_prob.get(class).map(Vec::as_slice)
    }

    /// Vocabulary size the parameters were fitted on.
    pub fn dim(&self) -> usize {
        self.feature_log_prob.first().map(Vec::len).unwrap_or(0)
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Unnormalized per-class log-scores (joint log-likelihood).
    pub fn joint_log_likelihood(&self, vector: &CountVector) -> Result<Vec<f64>, ModelError> {
        if vector.len() != self.dim() {
            return Err(ModelError::DimensionMismatch {
                expected: self.dim(),
                found: vector.len(),
            });
        }

        Ok(self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| {
                prior
                    + vector
                        .iter_nonzero()
                        .map(|(i, n)| f64::from(n) * row[i])
                        .sum::<f64>()
            })
            .collect())
    }

    /// Posterior probabilities aligned with [`classes`](Self::classes).
    pub fn posterior(&self, vector: &CountVector) -> Result<Vec<f64>, ModelError> {
        let jll = self.joint_log_likelihood(vector)?;
        Ok(softmax(&jll))
    }

    /// Posterior distribution keyed by label.
    pub fn predict_proba(&self, vector: &CountVector) -> Result<BTreeMap<String, f64>, ModelError> {
        let probs = self.posterior(vector)?;
        Ok(self.classes.iter().cloned().zip(probs).collect())
    }

    /// Most probable label and its posterior probability.
    ///
    /// Exact ties go to the lexicographically smallest label.
    pub fn predict_with_confidence(&self, vector: &CountVector) -> Result<(&str, f64), ModelError> {
        let probs = self.posterior(vector)?;
        let (best, p) = argmax(&probs);
        Ok((self.classes[best].as_str(), p))
    }

    pub fn predict(&self, vector: &CountVector) -> Result<&str, ModelError> {
        self.predict_with_confidence(vector).map(|(label, _)| label)
    }
}

/// Normalize log-scores into probabilities via log-sum-exp.
fn softmax(log_scores: &[f64]) -> Vec<f64> {
    let max = log_scores
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// First index holding the maximum value.
///
/// Classes are sorted, so the first maximum is the smallest label.
fn argmax(values: &[f64]) -> (usize, f64) {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    (best, values[best])
}
