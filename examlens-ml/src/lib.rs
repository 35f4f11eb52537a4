//! # examlens-ml
//!
//! Question difficulty prediction for examlens. A model is a pair of JSON
//! artifacts exported from a trained TF-IDF vectorizer and logistic
//! regression classifier:
//!
//! - `vectorizer.json`: vocabulary, idf weights and tokenizer flags
//! - `difficulty_model.json`: class labels, coefficients and intercepts
//!
//! Artifacts are read once and never written. [`load_predictor`] never fails;
//! a missing or inconsistent model degrades to
//! [`examlens_core::UnavailablePredictor`].

pub mod classifier;
pub mod error;
pub mod model;
pub mod text;
pub mod vectorizer;

pub use classifier::{ClassifierArtifact, LogisticRegression};
pub use error::{MlError, Result};
pub use model::{DifficultyModel, MODEL_FILE, VECTORIZER_FILE, load_predictor};
pub use vectorizer::{TfidfVectorizer, VectorizerArtifact};
