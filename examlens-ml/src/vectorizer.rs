//! TF-IDF vectorizer restored from an exported vocabulary.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{MlError, Result};
use crate::text::{DEFAULT_TOKEN_PATTERN, Tokenizer};

/// Sparse feature vector: `(column, value)` pairs in ascending column order.
pub type SparseVector = Vec<(usize, f64)>;

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

/// On-disk form of `vectorizer.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub stop_words: bool,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
}

/// Maps text to L2-normalised TF-IDF vectors.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    tokenizer: Tokenizer,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let n = artifact.idf.len();
        if n == 0 {
            return Err(MlError::invalid_model("vectorizer has an empty vocabulary"));
        }
        if artifact.vocabulary.len() != n {
            return Err(MlError::invalid_model(format!(
                "vocabulary has {} terms but idf has {n} weights",
                artifact.vocabulary.len()
            )));
        }
        if let Some((term, idx)) = artifact.vocabulary.iter().find(|&(_, &i)| i >= n) {
            return Err(MlError::invalid_model(format!(
                "term '{term}' maps to column {idx}, beyond {n} features"
            )));
        }
        if artifact.idf.iter().any(|w| !w.is_finite()) {
            return Err(MlError::invalid_model("idf weights must be finite"));
        }
        let tokenizer = Tokenizer::new(
            &artifact.token_pattern,
            artifact.lowercase,
            artifact.stop_words,
        )
        .map_err(|e| MlError::invalid_model(format!("bad token pattern: {e}")))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            tokenizer,
        })
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Term counts weighted by idf, scaled to unit length.
    ///
    /// Text with no known terms maps to the empty vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(&col) = self.vocabulary.get(&token) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: SparseVector = counts
            .into_iter()
            .map(|(col, tf)| (col, tf * self.idf[col]))
            .collect();
        let norm = weighted.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut weighted {
                *v /= norm;
            }
        }
        weighted
    }
}
