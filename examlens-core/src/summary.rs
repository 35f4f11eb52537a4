//! Exam-level aggregation of question metrics.

use serde::{Deserialize, Serialize};

use crate::metrics::QuestionMetrics;
use crate::quality::QualityLabel;

/// Counts per quality label plus the insights shown to the instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub total_questions: usize,
    pub excellent_questions: usize,
    pub good_questions: usize,
    pub poor_questions: usize,
    pub too_easy_questions: usize,
    pub too_hard_questions: usize,
    /// Share of questions labelled excellent, as a percentage rounded to 2 places.
    pub good_percentage: f64,
    #[serde(default)]
    pub weak_questions: Vec<String>,
    #[serde(default)]
    pub top_students: Vec<String>,
    #[serde(default)]
    pub bottom_students: Vec<String>,
}

impl ExamSummary {
    /// Number of questions carrying `label`.
    pub fn count(&self, label: QualityLabel) -> usize {
        match label {
            QualityLabel::Excellent => self.excellent_questions,
            QualityLabel::Good => self.good_questions,
            QualityLabel::Poor => self.poor_questions,
            QualityLabel::TooEasy => self.too_easy_questions,
            QualityLabel::TooHard => self.too_hard_questions,
        }
    }

    #[must_use]
    pub fn with_weak_questions(mut self, weak_questions: Vec<String>) -> Self {
        self.weak_questions = weak_questions;
        self
    }

    #[must_use]
    pub fn with_students(mut self, top: Vec<String>, bottom: Vec<String>) -> Self {
        self.top_students = top;
        self.bottom_students = bottom;
        self
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count questions per quality label.
///
/// # Panics
///
/// Panics if `metrics` is empty. A loaded dataset always has at least one
/// question, so an empty slice means the caller bypassed the loader.
pub fn summarize(metrics: &[QuestionMetrics]) -> ExamSummary {
    assert!(
        !metrics.is_empty(),
        "cannot summarize an exam with no questions"
    );

    let count = |label: QualityLabel| metrics.iter().filter(|m| m.quality == label).count();
    let total_questions = metrics.len();
    let excellent_questions = count(QualityLabel::Excellent);

    ExamSummary {
        total_questions,
        excellent_questions,
        good_questions: count(QualityLabel::Good),
        poor_questions: count(QualityLabel::Poor),
        too_easy_questions: count(QualityLabel::TooEasy),
        too_hard_questions: count(QualityLabel::TooHard),
        good_percentage: round2(100.0 * excellent_questions as f64 / total_questions as f64),
        weak_questions: Vec::new(),
        top_students: Vec::new(),
        bottom_students: Vec::new(),
    }
}
