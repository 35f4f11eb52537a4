//! Per-question aggregate statistics.
//!
//! The discrimination index uses the upper/lower group method: students are
//! ordered by total score across all questions, the lowest `k` form the
//! bottom group and the highest `k` the top group, with
//! `k = max(1, floor(group_fraction * n))`. For each question the difference
//! between the groups' mean marks is normalised by the question's observed
//! maximum so that indices are comparable across point values.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::config::AnalyticsConfig;
use crate::dataset::Dataset;
use crate::quality::{QualityLabel, classify};

/// Aggregates for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMetrics {
    pub question_id: String,
    pub avg_score: f64,
    /// Fraction of responses at or above the pass mark, in `[0, 1]`.
    pub pass_rate: f64,
    pub max_marks: f64,
    /// Nominally in `[-1, 1]`; exactly 0 for degenerate questions.
    pub discrimination_index: f64,
    pub quality: QualityLabel,
}

/// The top and bottom scoring student groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreGroups {
    pub top: HashSet<String>,
    pub bottom: HashSet<String>,
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Highest mark in a non-empty slice of non-negative marks.
pub fn question_max(marks: &[f64]) -> f64 {
    marks.iter().copied().fold(0.0, f64::max)
}

/// Mean mark, capped at `max_marks` so rounding in the sum cannot push it
/// above the observed maximum.
pub fn question_avg(marks: &[f64], max_marks: f64) -> f64 {
    mean(marks.iter().copied()).unwrap_or(0.0).min(max_marks)
}

/// Fraction of marks at or above `pass_marks`.
pub fn question_pass_rate(marks: &[f64], pass_marks: f64) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    let passed = marks.iter().filter(|&&m| m >= pass_marks).count();
    passed as f64 / marks.len() as f64
}

/// Mean marks per question.
pub fn avg_scores(dataset: &Dataset) -> BTreeMap<String, f64> {
    dataset
        .marks_by_question()
        .map(|(q, marks)| (q.to_string(), question_avg(&marks, question_max(&marks))))
        .collect()
}

/// Fraction of responses per question with marks at or above `pass_marks`.
pub fn pass_rates(dataset: &Dataset, pass_marks: f64) -> BTreeMap<String, f64> {
    dataset
        .marks_by_question()
        .map(|(q, marks)| (q.to_string(), question_pass_rate(&marks, pass_marks)))
        .collect()
}

/// Highest observed marks per question.
pub fn max_marks(dataset: &Dataset) -> BTreeMap<String, f64> {
    dataset
        .marks_by_question()
        .map(|(q, marks)| (q.to_string(), question_max(&marks)))
        .collect()
}

/// Group size for `n` students.
pub fn group_size(n: usize, group_fraction: f64) -> usize {
    ((group_fraction * n as f64).floor() as usize).max(1)
}

/// Split students into top and bottom groups by total score.
///
/// Students are sorted ascending by total with a stable sort, so ties keep
/// their first-appearance order. With a single student both groups contain
/// that student.
pub fn score_groups(dataset: &Dataset, group_fraction: f64) -> ScoreGroups {
    let mut totals = dataset.student_totals();
    totals.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = totals.len();
    let k = group_size(n, group_fraction).min(n);

    let bottom = totals[..k].iter().map(|(s, _)| s.clone()).collect();
    let top = totals[n - k..].iter().map(|(s, _)| s.clone()).collect();
    ScoreGroups { top, bottom }
}

/// Discrimination index of one question given precomputed groups.
pub fn question_discrimination(
    dataset: &Dataset,
    question_id: &str,
    groups: &ScoreGroups,
    max_marks: f64,
) -> f64 {
    let group_mean = |members: &HashSet<String>| {
        mean(
            dataset
                .responses_for_question(question_id)
                .filter(|r| members.contains(&r.student_id))
                .map(|r| r.marks),
        )
        .map(|m| m.min(max_marks))
    };

    match (group_mean(&groups.top), group_mean(&groups.bottom)) {
        (Some(top_avg), Some(bottom_avg)) if max_marks > 0.0 => (top_avg - bottom_avg) / max_marks,
        _ => 0.0,
    }
}

/// Discrimination index per question.
pub fn discrimination_indices(dataset: &Dataset, group_fraction: f64) -> BTreeMap<String, f64> {
    let groups = score_groups(dataset, group_fraction);
    let maxima = max_marks(dataset);

    maxima
        .iter()
        .map(|(q, &max)| {
            (
                q.clone(),
                question_discrimination(dataset, q, &groups, max),
            )
        })
        .collect()
}

/// Compute and classify every question in the dataset, in ascending id order.
pub fn compute_question_metrics(dataset: &Dataset, config: &AnalyticsConfig) -> Vec<QuestionMetrics> {
    let groups = score_groups(dataset, config.group_fraction);
    tracing::debug!(
        students = dataset.student_count(),
        group_size = groups.top.len(),
        "Split students into discrimination groups"
    );

    dataset
        .marks_by_question()
        .map(|(q, marks)| {
            let max_marks = question_max(&marks);
            let avg_score = question_avg(&marks, max_marks);
            let pass_rate = question_pass_rate(&marks, config.pass_marks);
            let discrimination_index = question_discrimination(dataset, q, &groups, max_marks);

            QuestionMetrics {
                question_id: q.to_string(),
                avg_score,
                pass_rate,
                max_marks,
                discrimination_index,
                quality: classify(pass_rate, discrimination_index),
            }
        })
        .collect()
}
