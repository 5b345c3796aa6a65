//! Terminal rendering for predictions and evaluation reports.

use std::fmt::Write as _;

use glossa_core::Prediction;
use glossa_model::EvaluationReport;
use glossa_model::evaluation::AverageMetrics;

const TEXT_PREVIEW: usize = 48;

// ── Predictions ──

/// One line per detected text: label, confidence, then the input.
pub fn format_prediction(text: &str, prediction: &Prediction) -> String {
    let marker = if prediction.degenerate { " (no known tokens)" } else { "" };
    format!(
        "{:<12} {:>6.2}%  {}{}",
        prediction.language,
        prediction.confidence * 100.0,
        preview(text),
        marker
    )
}

pub fn print_prediction(text: &str, prediction: &Prediction) {
    println!("{}", format_prediction(text, prediction));
}

fn preview(text: &str) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > TEXT_PREVIEW {
        let cut: String = flat.chars().take(TEXT_PREVIEW - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

// ── Evaluation ──

/// Classification report: per-label precision / recall / F1 / support, then
/// accuracy and the macro and weighted averages.
pub fn format_report(report: &EvaluationReport) -> String {
    let width = report
        .per_class
        .iter()
        .map(|c| c.label.chars().count())
        .chain(["weighted avg".len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>width$}  {:>9}  {:>9}  {:>9}  {:>9}",
        "", "precision", "recall", "f1-score", "support"
    );
    let _ = writeln!(out);
    for c in &report.per_class {
        let _ = writeln!(
            out,
            "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
            c.label, c.precision, c.recall, c.f1, c.support
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>9}",
        "accuracy", "", "", report.accuracy, report.total
    );
    average_row(&mut out, "macro avg", &report.macro_avg, report.total, width);
    average_row(&mut out, "weighted avg", &report.weighted_avg, report.total, width);
    out
}

pub fn print_report(report: &EvaluationReport) {
    print!("{}", format_report(report));
}

fn average_row(out: &mut String, name: &str, avg: &AverageMetrics, total: usize, width: usize) {
    let _ = writeln!(
        out,
        "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
        name, avg.precision, avg.recall, avg.f1, total
    );
}

#[cfg(test)]
mod tests {
    use glossa_model::evaluation::score;

    use super::*;

    #[test]
    fn prediction_line_shows_label_and_percent() {
        let p = Prediction {
            language: "English".into(),
            confidence: 0.9731,
            degenerate: false,
        };
        let line = format_prediction("Hello there", &p);
        assert!(line.starts_with("English"));
        assert!(line.contains("97.31%"));
        assert!(line.ends_with("Hello there"));
    }

    #[test]
    fn degenerate_prediction_is_marked() {
        let p = Prediction {
            language: "French".into(),
            confidence: 0.3,
            degenerate: true,
        };
        assert!(format_prediction("", &p).contains("no known tokens"));
    }

    #[test]
    fn long_text_is_shortened_to_one_line() {
        let text = "word ".repeat(40);
        let shown = preview(&format!("line one\n{text}"));
        assert!(!shown.contains('\n'));
        assert_eq!(shown.chars().count(), TEXT_PREVIEW);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn report_lists_every_label_and_summary_rows() {
        let report = score(
            &["English", "French", "French", "German"],
            &["English", "French", "German", "German"],
        );
        let text = format_report(&report);
        for needle in ["English", "French", "German", "accuracy", "macro avg", "weighted avg"] {
            assert!(text.contains(needle), "missing {needle}:\n{text}");
        }
        assert!(text.contains("0.75"), "{text}");
    }
}
