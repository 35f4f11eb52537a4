//! Learning-gap detection.
//!
//! Two policies are supported. `RelativeAverage` flags questions scoring far
//! below the best-performing question; `PassRateOrDiscrimination` flags
//! questions that are either rarely passed or fail to separate strong and weak
//! students.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::metrics::QuestionMetrics;

/// Which rule decides that a question is weak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum GapPolicy {
    /// Weak if `avg_score < threshold * max(avg_score over all questions)`.
    RelativeAverage {
        #[serde(default = "default_relative_threshold")]
        threshold: f64,
    },
    /// Weak if `pass_rate < min_pass_rate` or `discrimination_index < min_discrimination`.
    PassRateOrDiscrimination {
        #[serde(default = "default_min_pass_rate")]
        min_pass_rate: f64,
        #[serde(default = "default_min_discrimination")]
        min_discrimination: f64,
    },
}

impl Default for GapPolicy {
    fn default() -> Self {
        Self::RelativeAverage {
            threshold: default_relative_threshold(),
        }
    }
}

fn default_relative_threshold() -> f64 {
    0.4
}

fn default_min_pass_rate() -> f64 {
    0.5
}

fn default_min_discrimination() -> f64 {
    0.2
}

impl GapPolicy {
    /// The pass-rate/discrimination policy with its usual thresholds.
    pub fn pass_rate_or_discrimination() -> Self {
        Self::PassRateOrDiscrimination {
            min_pass_rate: default_min_pass_rate(),
            min_discrimination: default_min_discrimination(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RelativeAverage { .. } => "relative_average",
            Self::PassRateOrDiscrimination { .. } => "pass_rate_or_discrimination",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::RelativeAverage { threshold } => {
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(AnalyticsError::config(format!(
                        "gap threshold must be in [0, 1], got {threshold}"
                    )));
                }
            }
            Self::PassRateOrDiscrimination {
                min_pass_rate,
                min_discrimination,
            } => {
                if !(0.0..=1.0).contains(&min_pass_rate) {
                    return Err(AnalyticsError::config(format!(
                        "min_pass_rate must be in [0, 1], got {min_pass_rate}"
                    )));
                }
                if !(-1.0..=1.0).contains(&min_discrimination) {
                    return Err(AnalyticsError::config(format!(
                        "min_discrimination must be in [-1, 1], got {min_discrimination}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Question ids flagged as weak under `policy`, in the order given.
pub fn detect_learning_gaps(metrics: &[QuestionMetrics], policy: &GapPolicy) -> Vec<String> {
    let weak: Vec<String> = match *policy {
        GapPolicy::RelativeAverage { threshold } => {
            let best = metrics
                .iter()
                .map(|m| m.avg_score)
                .fold(f64::NEG_INFINITY, f64::max);
            let cutoff = threshold * best;
            metrics
                .iter()
                .filter(|m| m.avg_score < cutoff)
                .map(|m| m.question_id.clone())
                .collect()
        }
        GapPolicy::PassRateOrDiscrimination {
            min_pass_rate,
            min_discrimination,
        } => metrics
            .iter()
            .filter(|m| m.pass_rate < min_pass_rate || m.discrimination_index < min_discrimination)
            .map(|m| m.question_id.clone())
            .collect(),
    };

    tracing::debug!(policy = policy.name(), weak = weak.len(), "Detected learning gaps");
    weak
}
