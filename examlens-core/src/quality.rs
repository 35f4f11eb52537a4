//! Question quality classification.
//!
//! Classification is an ordered decision table over
//! `(pass_rate, discrimination_index)`. Rules are tried top to bottom and the
//! first match wins, so a very easy question that still discriminates well is
//! judged by the discrimination bands instead of being labelled too easy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical judgement of a question's pedagogical effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityLabel {
    #[serde(rename = "Too Easy (Low Discrimination)")]
    TooEasy,
    #[serde(rename = "Too Hard / Confusing")]
    TooHard,
    #[serde(rename = "Excellent Question")]
    Excellent,
    #[serde(rename = "Good Question")]
    Good,
    #[serde(rename = "Poor Question")]
    Poor,
}

impl QualityLabel {
    /// Every label, in decision-table order.
    pub const ALL: [QualityLabel; 5] = [
        Self::TooEasy,
        Self::TooHard,
        Self::Excellent,
        Self::Good,
        Self::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooEasy => "Too Easy (Low Discrimination)",
            Self::TooHard => "Too Hard / Confusing",
            Self::Excellent => "Excellent Question",
            Self::Good => "Good Question",
            Self::Poor => "Poor Question",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy)]
pub struct QualityRule {
    pub label: QualityLabel,
    /// Human-readable form of `matches`, for reports and debugging.
    pub condition: &'static str,
    matches: fn(f64, f64) -> bool,
}

impl QualityRule {
    pub fn matches(&self, pass_rate: f64, discrimination_index: f64) -> bool {
        (self.matches)(pass_rate, discrimination_index)
    }
}

/// The canonical decision table. Thresholds are part of the contract.
pub const QUALITY_RULES: [QualityRule; 5] = [
    QualityRule {
        label: QualityLabel::TooEasy,
        condition: "pass_rate > 0.85 and discrimination_index < 0.20",
        matches: |pr, di| pr > 0.85 && di < 0.20,
    },
    QualityRule {
        label: QualityLabel::TooHard,
        condition: "pass_rate < 0.30 and discrimination_index < 0.20",
        matches: |pr, di| pr < 0.30 && di < 0.20,
    },
    QualityRule {
        label: QualityLabel::Excellent,
        condition: "discrimination_index >= 0.40",
        matches: |_, di| di >= 0.40,
    },
    QualityRule {
        label: QualityLabel::Good,
        condition: "discrimination_index >= 0.20",
        matches: |_, di| di >= 0.20,
    },
    QualityRule {
        label: QualityLabel::Poor,
        condition: "otherwise",
        matches: |_, _| true,
    },
];

/// Label a question from its pass rate and discrimination index.
pub fn classify(pass_rate: f64, discrimination_index: f64) -> QualityLabel {
    matching_rule(pass_rate, discrimination_index)
        .map(|rule| rule.label)
        .unwrap_or(QualityLabel::Poor)
}

/// The first rule of [`QUALITY_RULES`] that applies.
pub fn matching_rule(pass_rate: f64, discrimination_index: f64) -> Option<&'static QualityRule> {
    QUALITY_RULES
        .iter()
        .find(|rule| rule.matches(pass_rate, discrimination_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_is_fixed() {
        let labels: Vec<_> = QUALITY_RULES.iter().map(|r| r.label).collect();
        assert_eq!(labels, QualityLabel::ALL.to_vec());
    }

    #[test]
    fn test_too_easy() {
        assert_eq!(classify(0.9, 0.1), QualityLabel::TooEasy);
        assert_eq!(classify(1.0, -0.5), QualityLabel::TooEasy);
    }

    #[test]
    fn test_easy_but_discriminating_falls_through() {
        assert_eq!(classify(0.95, 0.5), QualityLabel::Excellent);
        assert_eq!(classify(0.95, 0.25), QualityLabel::Good);
    }

    #[test]
    fn test_too_hard() {
        assert_eq!(classify(0.1, 0.0), QualityLabel::TooHard);
        assert_eq!(classify(0.29, 0.19), QualityLabel::TooHard);
    }

    #[test]
    fn test_hard_but_discriminating_falls_through() {
        assert_eq!(classify(0.1, 0.45), QualityLabel::Excellent);
    }

    #[test]
    fn test_boundaries() {
        // 0.85 is not "> 0.85"
        assert_eq!(classify(0.85, 0.1), QualityLabel::Poor);
        // 0.30 is not "< 0.30"
        assert_eq!(classify(0.30, 0.1), QualityLabel::Poor);
        assert_eq!(classify(0.5, 0.40), QualityLabel::Excellent);
        assert_eq!(classify(0.5, 0.20), QualityLabel::Good);
        assert_eq!(classify(0.5, 0.1999), QualityLabel::Poor);
    }

    #[test]
    fn test_matching_rule_exposes_condition() {
        let rule = matching_rule(0.5, 0.3).unwrap();
        assert_eq!(rule.label, QualityLabel::Good);
        assert_eq!(rule.condition, "discrimination_index >= 0.20");
    }

    #[test]
    fn test_label_strings() {
        assert_eq!(QualityLabel::TooEasy.to_string(), "Too Easy (Low Discrimination)");
        assert_eq!(QualityLabel::TooHard.to_string(), "Too Hard / Confusing");
        assert_eq!(
            serde_json::to_string(&QualityLabel::Excellent).unwrap(),
            "\"Excellent Question\""
        );
        let parsed: QualityLabel = serde_json::from_str("\"Poor Question\"").unwrap();
        assert_eq!(parsed, QualityLabel::Poor);
    }
}
