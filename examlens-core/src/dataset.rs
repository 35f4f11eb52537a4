//! Cleaned response records and their grouping indices.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{AnalyticsError, Result};

/// One observation: the marks a student scored on a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: String,
    pub student_id: String,
    /// Always finite and non-negative once inside a [`Dataset`].
    pub marks: f64,
}

impl Response {
    pub fn new(question_id: impl Into<String>, student_id: impl Into<String>, marks: f64) -> Self {
        Self {
            question_id: question_id.into(),
            student_id: student_id.into(),
            marks,
        }
    }
}

/// Immutable, non-empty collection of responses.
///
/// Questions are indexed in ascending id order, students in order of first
/// appearance. Both indices hold positions into `responses`.
#[derive(Debug, Clone)]
pub struct Dataset {
    responses: Vec<Response>,
    by_question: BTreeMap<String, Vec<usize>>,
    student_order: Vec<String>,
    by_student: HashMap<String, Vec<usize>>,
}

impl Dataset {
    /// Build a dataset, rejecting an empty response list.
    pub fn new(responses: Vec<Response>) -> Result<Self> {
        if responses.is_empty() {
            return Err(AnalyticsError::EmptyDataset { dropped: 0 });
        }

        let mut by_question: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_student: HashMap<String, Vec<usize>> = HashMap::new();
        let mut student_order = Vec::new();

        for (idx, response) in responses.iter().enumerate() {
            by_question
                .entry(response.question_id.clone())
                .or_default()
                .push(idx);
            by_student
                .entry(response.student_id.clone())
                .or_insert_with(|| {
                    student_order.push(response.student_id.clone());
                    Vec::new()
                })
                .push(idx);
        }

        Ok(Self {
            responses,
            by_question,
            student_order,
            by_student,
        })
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Distinct question ids in ascending order.
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.by_question.keys().map(String::as_str)
    }

    pub fn question_count(&self) -> usize {
        self.by_question.len()
    }

    /// Distinct student ids in first-appearance order.
    pub fn student_ids(&self) -> &[String] {
        &self.student_order
    }

    pub fn student_count(&self) -> usize {
        self.student_order.len()
    }

    /// Responses to a question, in dataset order.
    pub fn responses_for_question<'a>(
        &'a self,
        question_id: &str,
    ) -> impl Iterator<Item = &'a Response> + use<'a> {
        self.by_question
            .get(question_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.responses[idx])
    }

    /// Responses by a student, in dataset order.
    pub fn responses_for_student<'a>(
        &'a self,
        student_id: &str,
    ) -> impl Iterator<Item = &'a Response> + use<'a> {
        self.by_student
            .get(student_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.responses[idx])
    }

    /// Marks per question, grouped in ascending question order.
    pub fn marks_by_question(&self) -> impl Iterator<Item = (&str, Vec<f64>)> {
        self.by_question.iter().map(|(q, idxs)| {
            (
                q.as_str(),
                idxs.iter().map(|&i| self.responses[i].marks).collect(),
            )
        })
    }

    /// Total marks per student in first-appearance order.
    pub fn student_totals(&self) -> Vec<(String, f64)> {
        self.student_order
            .iter()
            .map(|s| {
                let total = self.responses_for_student(s).map(|r| r.marks).sum();
                (s.clone(), total)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Response::new("Q2", "S2", 3.0),
            Response::new("Q1", "S2", 1.0),
            Response::new("Q1", "S1", 4.0),
            Response::new("Q2", "S1", 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = Dataset::new(Vec::new()).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyDataset { .. }));
    }

    #[test]
    fn test_question_ids_sorted() {
        let ds = sample();
        assert_eq!(ds.question_ids().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
        assert_eq!(ds.question_count(), 2);
    }

    #[test]
    fn test_students_in_encounter_order() {
        let ds = sample();
        assert_eq!(ds.student_ids(), &["S2".to_string(), "S1".to_string()]);
    }

    #[test]
    fn test_student_totals() {
        let ds = sample();
        assert_eq!(
            ds.student_totals(),
            vec![("S2".to_string(), 4.0), ("S1".to_string(), 6.0)]
        );
    }

    #[test]
    fn test_marks_by_question() {
        let ds = sample();
        let grouped: Vec<_> = ds.marks_by_question().collect();
        assert_eq!(grouped, vec![("Q1", vec![1.0, 4.0]), ("Q2", vec![3.0, 2.0])]);
    }

    #[test]
    fn test_unknown_question_yields_nothing() {
        let ds = sample();
        assert_eq!(ds.responses_for_question("Q9").count(), 0);
    }
}
