//! Error types for the examlens-ml crate.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating model artifacts.
///
/// These never cross into the analysis pipeline: [`crate::load_predictor`]
/// turns every one of them into the unavailable predictor.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("Artifact not found: {}", path.display())]
    Artifact { path: PathBuf },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MlError {
    pub fn artifact(path: impl AsRef<Path>) -> Self {
        Self::Artifact {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn invalid_model(msg: impl Into<String>) -> Self {
        Self::InvalidModel(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MlError>;
