//! Plain-text instructor report.
//!
//! Rendering is deterministic: the same summary and weak-question list always
//! produce byte-identical output.

use std::fmt::Write;

use crate::summary::ExamSummary;

/// Shown instead of a list when no weak questions were detected.
pub const NO_GAPS_MESSAGE: &str =
    "No major learning gaps detected. Performance is consistent across all questions.";

/// Render the report for `summary` and its weak questions.
pub fn render_report(summary: &ExamSummary, weak_questions: &[String]) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Exam Analysis Report");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out, "Total questions analysed: {}", summary.total_questions);
    let _ = writeln!(out, "Excellent questions: {}", summary.excellent_questions);
    let _ = writeln!(out, "Good questions: {}", summary.good_questions);
    let _ = writeln!(out, "Poor questions: {}", summary.poor_questions);
    let _ = writeln!(out, "Too easy questions: {}", summary.too_easy_questions);
    let _ = writeln!(
        out,
        "Too hard or confusing questions: {}",
        summary.too_hard_questions
    );
    let _ = writeln!(
        out,
        "Excellent question share: {:.2}%",
        summary.good_percentage
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Learning gaps:");
    if weak_questions.is_empty() {
        let _ = writeln!(out, "  {NO_GAPS_MESSAGE}");
    } else {
        let _ = writeln!(
            out,
            "  Students struggled with {} question(s):",
            weak_questions.len()
        );
        for q in weak_questions {
            let _ = writeln!(out, "  - {q}");
        }
    }

    let recommendations = recommendations(summary);
    if !recommendations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendations:");
        for line in recommendations {
            let _ = writeln!(out, "  - {line}");
        }
    }

    if !summary.top_students.is_empty() || !summary.bottom_students.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top students: {}", join_or_none(&summary.top_students));
        let _ = writeln!(
            out,
            "Students needing support: {}",
            join_or_none(&summary.bottom_students)
        );
    }

    out
}

fn recommendations(summary: &ExamSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.too_hard_questions > 0 {
        lines.push(format!(
            "Review {} too hard or confusing question(s) for unclear wording or untaught content.",
            summary.too_hard_questions
        ));
    }
    if summary.too_easy_questions > 0 {
        lines.push(format!(
            "Consider raising the difficulty of {} question(s) that nearly everyone passes.",
            summary.too_easy_questions
        ));
    }
    if summary.poor_questions > 0 {
        lines.push(format!(
            "Revise {} poorly discriminating question(s).",
            summary.poor_questions
        ));
    }
    lines
}

fn join_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary() -> ExamSummary {
        ExamSummary {
            total_questions: 4,
            excellent_questions: 1,
            good_questions: 1,
            poor_questions: 1,
            too_easy_questions: 0,
            too_hard_questions: 1,
            good_percentage: 25.0,
            weak_questions: Vec::new(),
            top_students: Vec::new(),
            bottom_students: Vec::new(),
        }
    }

    #[test]
    fn test_render_with_gaps() {
        let report = render_report(&summary(), &["Q3".to_string(), "Q4".to_string()]);
        let expected = "\
Exam Analysis Report
====================
Total questions analysed: 4
Excellent questions: 1
Good questions: 1
Poor questions: 1
Too easy questions: 0
Too hard or confusing questions: 1
Excellent question share: 25.00%

Learning gaps:
  Students struggled with 2 question(s):
  - Q3
  - Q4

Recommendations:
  - Review 1 too hard or confusing question(s) for unclear wording or untaught content.
  - Revise 1 poorly discriminating question(s).
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_render_without_gaps_uses_fixed_sentence() {
        let report = render_report(&summary(), &[]);
        assert!(report.contains(NO_GAPS_MESSAGE));
        assert!(!report.contains("struggled"));
    }

    #[test]
    fn test_render_students() {
        let s = summary().with_students(vec!["S1".into(), "S2".into()], Vec::new());
        let report = render_report(&s, &[]);
        assert!(report.contains("Top students: S1, S2\n"));
        assert!(report.contains("Students needing support: none\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let s = summary();
        let weak = vec!["Q1".to_string()];
        assert_eq!(render_report(&s, &weak), render_report(&s, &weak));
    }

    #[test]
    fn test_no_recommendations_when_all_good() {
        let mut s = summary();
        s.poor_questions = 0;
        s.too_hard_questions = 0;
        let report = render_report(&s, &[]);
        assert!(!report.contains("Recommendations:"));
    }
}
