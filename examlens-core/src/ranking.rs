//! Student ranking by total marks.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// A student's total across every question they answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentTotal {
    pub student_id: String,
    pub total_marks: f64,
}

/// Students ordered by total marks, highest first.
///
/// The sort is stable over first-appearance order, so tied students keep the
/// order in which they first appear in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRanking {
    entries: Vec<StudentTotal>,
}

impl StudentRanking {
    pub fn entries(&self) -> &[StudentTotal] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of the first `n` students (fewer if the ranking is shorter).
    pub fn top(&self, n: usize) -> Vec<String> {
        self.entries
            .iter()
            .take(n)
            .map(|e| e.student_id.clone())
            .collect()
    }

    /// Ids of the last `n` students, kept in ranking order.
    pub fn bottom(&self, n: usize) -> Vec<String> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..]
            .iter()
            .map(|e| e.student_id.clone())
            .collect()
    }

    /// 1-based position of a student, if ranked.
    pub fn position(&self, student_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.student_id == student_id)
            .map(|i| i + 1)
    }
}

/// Sum marks per student and sort descending.
pub fn rank_students(dataset: &Dataset) -> StudentRanking {
    let mut entries: Vec<StudentTotal> = dataset
        .student_totals()
        .into_iter()
        .map(|(student_id, total_marks)| StudentTotal {
            student_id,
            total_marks,
        })
        .collect();
    entries.sort_by(|a, b| b.total_marks.total_cmp(&a.total_marks));
    StudentRanking { entries }
}
