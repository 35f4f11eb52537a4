//! Configuration system for examlens.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/examlens/config.toml` and/or `.examlens/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, Result};
use crate::gaps::GapPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamConfig {
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub ml: MlConfig,
}

/// Tunables for the statistical pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Minimum marks for a response to count as a pass.
    #[serde(default = "default_pass_marks")]
    pub pass_marks: f64,
    /// Share of students in each of the top and bottom discrimination groups.
    #[serde(default = "default_group_fraction")]
    pub group_fraction: f64,
    /// How many students to list as top and bottom performers.
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,
    #[serde(default)]
    pub gap_policy: GapPolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            pass_marks: default_pass_marks(),
            group_fraction: default_group_fraction(),
            ranking_size: default_ranking_size(),
            gap_policy: GapPolicy::default(),
        }
    }
}

fn default_pass_marks() -> f64 {
    2.0
}

fn default_group_fraction() -> f64 {
    0.27
}

fn default_ranking_size() -> usize {
    5
}

impl AnalyticsConfig {
    /// Reject values that would make the statistics meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.pass_marks.is_finite() || self.pass_marks < 0.0 {
            return Err(AnalyticsError::config(format!(
                "pass_marks must be a non-negative number, got {}",
                self.pass_marks
            )));
        }
        if !(self.group_fraction > 0.0 && self.group_fraction <= 0.5) {
            return Err(AnalyticsError::config(format!(
                "group_fraction must be in (0, 0.5], got {}",
                self.group_fraction
            )));
        }
        if self.ranking_size == 0 {
            return Err(AnalyticsError::config("ranking_size must be at least 1"));
        }
        self.gap_policy.validate()
    }
}

/// Difficulty predictor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlConfig {
    /// Attach ML difficulty labels when artifacts are available.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Directory holding `vectorizer.json` and `difficulty_model.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ExamConfig {
    pub fn validate(&self) -> Result<()> {
        self.analytics.validate()
    }
}

/// Values that take precedence over every other layer.
///
/// Only fields that are `Some` are applied; everything else keeps the value
/// from the lower layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigOverrides {
    pub analytics: AnalyticsOverrides,
    pub ml: MlOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_marks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_policy: Option<GapPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MlOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "examlens", "examlens")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-local config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".examlens").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `EXAMLENS_`)
/// 3. Workspace-local config (`.examlens/config.toml`)
/// 4. User config (`~/.config/examlens/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ConfigOverrides>,
) -> Result<ExamConfig> {
    let mut figment = Figment::from(Serialized::defaults(ExamConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // EXAMLENS_ANALYTICS__PASS_MARKS, EXAMLENS_ML__MODEL_DIR, etc.
    figment = figment.merge(Env::prefixed("EXAMLENS_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: ExamConfig = figment
        .extract()
        .map_err(|e| AnalyticsError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Check whether any examlens config file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExamConfig::default();
        assert_eq!(config.analytics.pass_marks, 2.0);
        assert_eq!(config.analytics.group_fraction, 0.27);
        assert_eq!(config.analytics.ranking_size, 5);
        assert_eq!(
            config.analytics.gap_policy,
            GapPolicy::RelativeAverage { threshold: 0.4 }
        );
        assert!(config.ml.enabled);
        assert!(config.ml.model_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ExamConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: ExamConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_backward_compat_empty_file() {
        let config: ExamConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExamConfig::default());
    }

    #[test]
    fn test_load_config_with_overrides() {
        let mut overrides = ConfigOverrides::default();
        overrides.analytics.pass_marks = Some(3.0);
        overrides.analytics.ranking_size = Some(3);

        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.analytics.pass_marks, 3.0);
        assert_eq!(config.analytics.ranking_size, 3);
        assert_eq!(config.analytics.group_fraction, 0.27);
        assert!(config.ml.enabled);
    }

    #[test]
    fn test_partial_override_keeps_workspace_values() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".examlens");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[analytics]\ngroup_fraction = 0.25\nranking_size = 3\n\n[ml]\nmodel_dir = \"models\"\n",
        )
        .unwrap();

        let mut overrides = ConfigOverrides::default();
        overrides.analytics.pass_marks = Some(3.0);

        let config = load_config(Some(dir.path()), Some(&overrides)).unwrap();
        assert_eq!(config.analytics.pass_marks, 3.0);
        assert_eq!(config.analytics.group_fraction, 0.25);
        assert_eq!(config.analytics.ranking_size, 3);
        assert_eq!(config.ml.model_dir, Some(PathBuf::from("models")));
    }

    #[test]
    fn test_gap_policy_override_replaces_workspace_policy() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".examlens");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[analytics.gap_policy]\npolicy = \"pass_rate_or_discrimination\"\nmin_pass_rate = 0.6\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            analytics: AnalyticsOverrides {
                gap_policy: Some(GapPolicy::default()),
                ..AnalyticsOverrides::default()
            },
            ..ConfigOverrides::default()
        };
        let config = load_config(Some(dir.path()), Some(&overrides)).unwrap();
        assert_eq!(config.analytics.gap_policy, GapPolicy::default());
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let config = load_config(None, Some(&ConfigOverrides::default())).unwrap();
        assert_eq!(config, load_config(None, None).unwrap());
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".examlens");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            r#"
[analytics]
pass_marks = 3.5
group_fraction = 0.25

[analytics.gap_policy]
policy = "pass_rate_or_discrimination"
min_pass_rate = 0.6
min_discrimination = 0.15

[ml]
enabled = false
model_dir = "models"
"#,
        )
        .unwrap();

        assert!(config_exists(Some(dir.path())));
        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.analytics.pass_marks, 3.5);
        assert_eq!(config.analytics.group_fraction, 0.25);
        assert_eq!(config.analytics.ranking_size, 5);
        assert_eq!(
            config.analytics.gap_policy,
            GapPolicy::PassRateOrDiscrimination {
                min_pass_rate: 0.6,
                min_discrimination: 0.15,
            }
        );
        assert!(!config.ml.enabled);
        assert_eq!(config.ml.model_dir, Some(PathBuf::from("models")));
    }

    #[test]
    fn test_invalid_workspace_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".examlens");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[analytics]\ngroup_fraction = 0.9\n").unwrap();

        let err = load_config(Some(dir.path()), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalyticsConfig::default();
        config.pass_marks = -1.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.group_fraction = 0.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.ranking_size = 0;
        assert!(config.validate().is_err());
    }
}
