//! The difficulty model and its loader.

use std::path::Path;

use examlens_core::{DifficultyPredictor, UnavailablePredictor};

use crate::classifier::{ClassifierArtifact, LogisticRegression};
use crate::error::{MlError, Result};
use crate::vectorizer::{TfidfVectorizer, VectorizerArtifact};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const MODEL_FILE: &str = "difficulty_model.json";

/// TF-IDF features fed into a logistic regression.
#[derive(Debug, Clone)]
pub struct DifficultyModel {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(MlError::artifact(path));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl DifficultyModel {
    pub fn from_parts(vectorizer: TfidfVectorizer, classifier: LogisticRegression) -> Result<Self> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(MlError::invalid_model(format!(
                "vectorizer produces {} features but classifier expects {}",
                vectorizer.n_features(),
                classifier.n_features()
            )));
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Load both artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let vectorizer: VectorizerArtifact = read_artifact(&dir.join(VECTORIZER_FILE))?;
        let classifier: ClassifierArtifact = read_artifact(&dir.join(MODEL_FILE))?;
        Self::from_parts(
            TfidfVectorizer::from_artifact(vectorizer)?,
            LogisticRegression::from_artifact(classifier)?,
        )
    }

    pub fn predict_one(&self, text: &str) -> &str {
        self.classifier.predict(&self.vectorizer.transform(text))
    }
}

impl DifficultyPredictor for DifficultyModel {
    fn predict(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .map(|t| self.predict_one(t).to_string())
            .collect()
    }

    fn name(&self) -> &str {
        "tfidf-logistic"
    }
}

/// Load the model in `dir`, falling back to the unavailable predictor.
pub fn load_predictor(dir: &Path) -> Box<dyn DifficultyPredictor> {
    match DifficultyModel::load(dir) {
        Ok(model) => {
            tracing::info!(
                dir = %dir.display(),
                classes = model.classifier.classes().len(),
                features = model.vectorizer.n_features(),
                "Loaded difficulty model"
            );
            Box::new(model)
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Difficulty model unavailable");
            Box::new(UnavailablePredictor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examlens_core::NOT_AVAILABLE;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const VECTORIZER: &str = r#"{
        "vocabulary": {"integral": 0, "derivative": 1, "add": 2},
        "idf": [1.0, 1.0, 1.0]
    }"#;

    const MODEL: &str = r#"{
        "classes": ["Easy", "Hard"],
        "coef": [[2.0, 1.0, -3.0]],
        "intercept": [0.0]
    }"#;

    fn model_dir(vectorizer: Option<&str>, model: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        if let Some(v) = vectorizer {
            std::fs::write(dir.path().join(VECTORIZER_FILE), v).unwrap();
        }
        if let Some(m) = model {
            std::fs::write(dir.path().join(MODEL_FILE), m).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_and_predict() {
        let dir = model_dir(Some(VECTORIZER), Some(MODEL));
        let model = DifficultyModel::load(dir.path()).unwrap();
        assert_eq!(model.predict_one("Evaluate the integral"), "Hard");
        assert_eq!(model.predict_one("Add two numbers"), "Easy");
        assert_eq!(model.predict_one("Unrelated words"), "Easy");
    }

    #[test]
    fn test_predictor_keeps_input_order() {
        let dir = model_dir(Some(VECTORIZER), Some(MODEL));
        let predictor = load_predictor(dir.path());
        assert!(predictor.is_available());
        let texts = vec!["add".to_string(), "derivative".to_string()];
        assert_eq!(predictor.predict(&texts), vec!["Easy", "Hard"]);
    }

    #[test]
    fn test_missing_artifacts_yield_sentinel() {
        let dir = model_dir(Some(VECTORIZER), None);
        let err = DifficultyModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, MlError::Artifact { .. }));

        let predictor = load_predictor(dir.path());
        assert!(!predictor.is_available());
        assert_eq!(predictor.predict(&["Q1".to_string()]), vec![NOT_AVAILABLE]);
    }

    #[test]
    fn test_corrupt_artifact_yields_sentinel() {
        let dir = model_dir(Some("{ not json"), Some(MODEL));
        assert!(matches!(
            DifficultyModel::load(dir.path()).unwrap_err(),
            MlError::Serde(_)
        ));
        assert!(!load_predictor(dir.path()).is_available());
    }

    #[test]
    fn test_feature_count_mismatch_rejected() {
        let model = r#"{"classes": ["Easy", "Hard"], "coef": [[1.0, 2.0]], "intercept": [0.0]}"#;
        let dir = model_dir(Some(VECTORIZER), Some(model));
        assert!(matches!(
            DifficultyModel::load(dir.path()).unwrap_err(),
            MlError::InvalidModel(_)
        ));
    }
}
