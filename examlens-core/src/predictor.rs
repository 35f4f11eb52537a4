//! Difficulty prediction boundary.
//!
//! Predictors are an optional enrichment. They cannot fail: an implementation
//! that has nothing to offer returns [`NOT_AVAILABLE`] for every input.

/// Label attached to questions when no prediction is available.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Predicts a difficulty label from question text.
pub trait DifficultyPredictor: Send + Sync {
    /// One label per input, in input order.
    fn predict(&self, texts: &[String]) -> Vec<String>;

    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Whether predictions carry information beyond the sentinel.
    fn is_available(&self) -> bool {
        true
    }
}

/// Default predictor used when no model is configured or loadable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePredictor;

impl DifficultyPredictor for UnavailablePredictor {
    fn predict(&self, texts: &[String]) -> Vec<String> {
        vec![NOT_AVAILABLE.to_string(); texts.len()]
    }

    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Run `predictor`, substituting the sentinel when its output is unusable.
pub fn predict_or_sentinel(predictor: &dyn DifficultyPredictor, texts: &[String]) -> Vec<String> {
    let labels = predictor.predict(texts);
    if labels.len() == texts.len() {
        return labels;
    }
    tracing::warn!(
        predictor = predictor.name(),
        expected = texts.len(),
        got = labels.len(),
        "Difficulty predictor returned the wrong number of labels; ignoring its output"
    );
    UnavailablePredictor.predict(texts)
}
