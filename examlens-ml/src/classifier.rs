//! Linear classifier restored from exported logistic regression weights.

use serde::{Deserialize, Serialize};

use crate::error::{MlError, Result};
use crate::vectorizer::SparseVector;

/// On-disk form of `difficulty_model.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub classes: Vec<String>,
    /// One row per class, or a single row for binary models.
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LogisticRegression {
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
        let ClassifierArtifact {
            classes,
            coef,
            intercept,
        } = artifact;

        if classes.len() < 2 {
            return Err(MlError::invalid_model(format!(
                "need at least 2 classes, found {}",
                classes.len()
            )));
        }
        let binary = classes.len() == 2 && coef.len() == 1;
        if !binary && coef.len() != classes.len() {
            return Err(MlError::invalid_model(format!(
                "{} classes but {} coefficient rows",
                classes.len(),
                coef.len()
            )));
        }
        if intercept.len() != coef.len() {
            return Err(MlError::invalid_model(format!(
                "{} coefficient rows but {} intercepts",
                coef.len(),
                intercept.len()
            )));
        }
        let width = coef[0].len();
        if coef.iter().any(|row| row.len() != width) {
            return Err(MlError::invalid_model("coefficient rows differ in length"));
        }

        Ok(Self {
            classes,
            coef,
            intercept,
        })
    }

    pub fn n_features(&self) -> usize {
        self.coef[0].len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn decision(&self, row: usize, x: &SparseVector) -> f64 {
        let weights = &self.coef[row];
        self.intercept[row]
            + x.iter()
                .filter_map(|&(col, v)| weights.get(col).map(|w| w * v))
                .sum::<f64>()
    }

    /// Predicted class label. Ties go to the earlier class.
    pub fn predict(&self, x: &SparseVector) -> &str {
        if self.coef.len() == 1 {
            let idx = usize::from(self.decision(0, x) > 0.0);
            return &self.classes[idx];
        }
        let mut best = 0;
        let mut best_score = self.decision(0, x);
        for row in 1..self.coef.len() {
            let score = self.decision(row, x);
            if score > best_score {
                best = row;
                best_score = score;
            }
        }
        &self.classes[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_binary_threshold_at_zero() {
        let model = LogisticRegression::from_artifact(ClassifierArtifact {
            classes: classes(&["Easy", "Hard"]),
            coef: vec![vec![2.0, -1.0]],
            intercept: vec![0.0],
        })
        .unwrap();
        assert_eq!(model.predict(&vec![(0, 1.0)]), "Hard");
        assert_eq!(model.predict(&vec![(1, 1.0)]), "Easy");
        // decision exactly 0 is not positive
        assert_eq!(model.predict(&vec![]), "Easy");
    }

    #[test]
    fn test_multinomial_argmax() {
        let model = LogisticRegression::from_artifact(ClassifierArtifact {
            classes: classes(&["Easy", "Medium", "Hard"]),
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]],
            intercept: vec![0.0, 0.0, 0.2],
        })
        .unwrap();
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&vec![(0, 1.0)]), "Easy");
        assert_eq!(model.predict(&vec![(1, 1.0)]), "Medium");
        assert_eq!(model.predict(&vec![]), "Hard");
    }

    #[test]
    fn test_ties_pick_first_class() {
        let model = LogisticRegression::from_artifact(ClassifierArtifact {
            classes: classes(&["Easy", "Medium", "Hard"]),
            coef: vec![vec![0.0]; 3],
            intercept: vec![0.0; 3],
        })
        .unwrap();
        assert_eq!(model.predict(&vec![(0, 1.0)]), "Easy");
    }

    #[test]
    fn test_shape_validation() {
        let bad_rows = ClassifierArtifact {
            classes: classes(&["Easy", "Medium", "Hard"]),
            coef: vec![vec![1.0]],
            intercept: vec![0.0],
        };
        assert!(LogisticRegression::from_artifact(bad_rows).is_err());

        let bad_intercepts = ClassifierArtifact {
            classes: classes(&["Easy", "Hard"]),
            coef: vec![vec![1.0]],
            intercept: vec![0.0, 1.0],
        };
        assert!(LogisticRegression::from_artifact(bad_intercepts).is_err());

        let ragged = ClassifierArtifact {
            classes: classes(&["Easy", "Hard"]),
            coef: vec![vec![1.0], vec![1.0, 2.0]],
            intercept: vec![0.0, 0.0],
        };
        assert!(LogisticRegression::from_artifact(ragged).is_err());

        let single_class = ClassifierArtifact {
            classes: classes(&["Easy"]),
            coef: vec![vec![1.0]],
            intercept: vec![0.0],
        };
        assert!(LogisticRegression::from_artifact(single_class).is_err());
    }
}
