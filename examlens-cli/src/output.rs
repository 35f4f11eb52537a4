//! Terminal rendering of analysis results.

use examlens_core::{Analysis, QuestionReport};
use std::fmt::Write as _;

/// Fixed-width table of per-question statistics.
pub fn question_table(report: &QuestionReport) -> String {
    let id_width = report
        .rows
        .iter()
        .map(|r| r.question_id.len())
        .chain(std::iter::once("Question".len()))
        .max()
        .unwrap_or(8);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:>9}  {:>9}  {:>9}  {:>14}  {:<30}  ML Difficulty",
        "Question", "Avg Score", "Pass Rate", "Max Marks", "Discrimination", "Quality"
    );
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>14.2}  {:<30}  {}",
            row.question_id,
            row.avg_score,
            row.pass_rate,
            row.max_marks,
            row.discrimination_index,
            row.quality.as_str(),
            row.ml_difficulty
        );
    }
    out
}

/// Full human-readable output of `examlens analyze`.
pub fn render_analysis(analysis: &Analysis) -> String {
    let mut out = question_table(&analysis.report);
    let stats = &analysis.load_stats;
    if stats.dropped_rows > 0 {
        let _ = writeln!(
            out,
            "\n{} of {} row(s) dropped during cleaning.",
            stats.dropped_rows, stats.total_rows
        );
    }
    let _ = writeln!(out);
    out.push_str(&analysis.insights.teacher_report);
    out
}
