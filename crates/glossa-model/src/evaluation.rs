//! Hold-out evaluation: seeded train/test split and a per-class report.

use std::collections::{BTreeSet, HashMap};

use glossa_core::TrainingExample;
use tracing::info;

use crate::ModelError;
use crate::pipeline::TrainedModel;

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Shuffle `corpus` with `seed` and split off `ceil(test_fraction * n)` rows
/// for testing.
///
/// Returns `(train, test)`. Both sides must be non-empty.
pub fn train_test_split(
    corpus: &[TrainingExample],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<TrainingExample>, Vec<TrainingExample>), ModelError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidSplit(test_fraction));
    }

    let n = corpus.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(ModelError::InvalidSplit(test_fraction));
    }

    let mut order: Vec<usize> = (0..n).collect();
    fastrand::Rng::with_seed(seed).shuffle(&mut order);

    let test = order[..n_test].iter().map(|&i| corpus[i].clone()).collect();
    let train = order[n_test..].iter().map(|&i| corpus[i].clone()).collect();
    Ok((train, test))
}

/// Precision / recall / F1 for one label.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of test rows whose true label is `label`.
    pub support: usize,
}

/// Averaged precision / recall / F1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Outcome of scoring a model against labelled rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub accuracy: f64,
    /// Sorted by label; includes labels that were only ever predicted.
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub total: usize,
}

/// Score `model` against `test`.
pub fn evaluate(model: &TrainedModel, test: &[TrainingExample]) -> Result<EvaluationReport, ModelError> {
    if test.is_empty() {
        return Err(ModelError::EmptyCorpus);
    }

    let mut predicted = Vec::with_capacity(test.len());
    for example in test {
        predicted.push(model.predict(&example.text)?.language);
    }
    let truth: Vec<&str> = test.iter().map(|e| e.language.as_str()).collect();
    let predicted: Vec<&str> = predicted.iter().map(String::as_str).collect();

    let report = score(&truth, &predicted);
    info!(
        rows = report.total,
        accuracy = report.accuracy,
        "evaluated language model"
    );
    Ok(report)
}

/// Build a report from aligned true and predicted labels.
pub fn score(truth: &[&str], predicted: &[&str]) -> EvaluationReport {
    let labels: BTreeSet<&str> = truth.iter().chain(predicted).copied().collect();

    // label → (true positives, predicted count, support)
    let mut tally: HashMap<&str, (usize, usize, usize)> = HashMap::new();
    let mut correct = 0usize;
    for (&t, &p) in truth.iter().zip(predicted) {
        tally.entry(t).or_default().2 += 1;
        tally.entry(p).or_default().1 += 1;
        if t == p {
            tally.entry(t).or_default().0 += 1;
            correct += 1;
        }
    }

    let total = truth.len().min(predicted.len());
    let per_class: Vec<ClassMetrics> = labels
        .into_iter()
        .map(|label| {
            let (tp, pred, support) = tally.get(label).copied().unwrap_or_default();
            let precision = ratio(tp, pred);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let macro_avg = average(&per_class, |_| 1.0);
    let weighted_avg = average(&per_class, |m| m.support as f64);

    EvaluationReport {
        accuracy: ratio(correct, total),
        per_class,
        macro_avg,
        weighted_avg,
        total,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn average(metrics: &[ClassMetrics], weight: impl Fn(&ClassMetrics) -> f64) -> AverageMetrics {
    let total: f64 = metrics.iter().map(&weight).sum();
    if total == 0.0 {
        return AverageMetrics::default();
    }
    let mut avg = AverageMetrics::default();
    for m in metrics {
        let w = weight(m) / total;
        avg.precision += w * m.precision;
        avg.recall += w * m.recall;
        avg.f1 += w * m.f1;
    }
    avg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DEFAULT_SMOOTHING;
    use crate::training::{fixtures, train};

    #[test]
    fn split_sizes_follow_ceiling() {
        let corpus = fixtures::four_languages();
        let (train, test) = train_test_split(&corpus, 0.2, DEFAULT_SEED).unwrap();
        // ceil(0.2 * 16) = 4
        assert_eq!(test.len(), 4);
        assert_eq!(train.len(), 12);
    }

    #[test]
    fn split_is_a_partition() {
        let corpus = fixtures::four_languages();
        let (train, test) = train_test_split(&corpus, 0.25, 7).unwrap();
        let mut all: Vec<String> = train.iter().chain(&test).map(|e| e.text.clone()).collect();
        let mut expected: Vec<String> = corpus.iter().map(|e| e.text.clone()).collect();
        all.sort();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn split_is_reproducible_per_seed() {
        let corpus = fixtures::four_languages();
        let a = train_test_split(&corpus, 0.2, 42).unwrap();
        let b = train_test_split(&corpus, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn split_rejects_degenerate_fractions() {
        let corpus = fixtures::four_languages();
        for f in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(
                matches!(train_test_split(&corpus, f, 1), Err(ModelError::InvalidSplit(_))),
                "fraction {f}"
            );
        }
        let single = &corpus[..1];
        assert!(train_test_split(single, 0.2, 1).is_err());
    }

    #[test]
    fn score_computes_per_class_metrics() {
        let truth = ["en", "en", "fr", "fr", "es"];
        let pred = ["en", "fr", "fr", "fr", "en"];
        let report = score(&truth, &pred);

        assert_eq!(report.total, 5);
        assert!((report.accuracy - 0.6).abs() < 1e-12);

        let labels: Vec<&str> = report.per_class.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["en", "es", "fr"]);

        let en = &report.per_class[0];
        assert!((en.precision - 0.5).abs() < 1e-12);
        assert!((en.recall - 0.5).abs() < 1e-12);
        assert_eq!(en.support, 2);

        let es = &report.per_class[1];
        assert_eq!(es.precision, 0.0);
        assert_eq!(es.recall, 0.0);
        assert_eq!(es.f1, 0.0);

        let fr = &report.per_class[2];
        assert!((fr.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((fr.recall - 1.0).abs() < 1e-12);
        assert!((fr.f1 - 0.8).abs() < 1e-12);
    }

    #[test]
    fn score_includes_labels_only_predicted() {
        let report = score(&["en", "en"], &["en", "de"]);
        let de = report.per_class.iter().find(|m| m.label == "de").unwrap();
        assert_eq!(de.support, 0);
        assert_eq!(de.precision, 0.0);
    }

    #[test]
    fn weighted_average_uses_support() {
        let report = score(&["a", "a", "a", "b"], &["a", "a", "a", "a"]);
        // a: p=0.75 r=1.0; b: p=0 r=0
        assert!((report.macro_avg.recall - 0.5).abs() < 1e-12);
        assert!((report.weighted_avg.recall - 0.75).abs() < 1e-12);
    }

    #[test]
    fn evaluate_on_training_rows_is_accurate() {
        let corpus = fixtures::four_languages();
        let model = train(&corpus, DEFAULT_SMOOTHING).unwrap();
        let report = evaluate(&model, &corpus).unwrap();
        assert_eq!(report.total, corpus.len());
        assert!(report.accuracy > 0.9, "accuracy {}", report.accuracy);
        assert_eq!(report.per_class.len(), 4);
    }

    #[test]
    fn evaluate_rejects_empty_test_set() {
        let model = train(&fixtures::four_languages(), DEFAULT_SMOOTHING).unwrap();
        assert!(matches!(evaluate(&model, &[]), Err(ModelError::EmptyCorpus)));
    }
}
