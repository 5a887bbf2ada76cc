//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub recommender: RecommenderConfig,
}

/// Health score weights and tip thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the biomarker sub-score, in percent
    pub biomarker_weight: u32,
    /// Weight of the genetic sub-score, in percent
    pub genetic_weight: u32,
    /// Weight of the lifestyle sub-score, in percent
    pub lifestyle_weight: u32,
    /// Sub-score used when there is nothing to score
    pub neutral_score: u32,
    /// Sub-scores below this generate tips
    pub tip_threshold: u32,
    /// Smoking scores below this generate a tip
    pub smoking_tip_threshold: u32,
    /// Alcohol scores below this generate a tip
    pub alcohol_tip_threshold: u32,
    pub max_tips: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            biomarker_weight: 50,
            genetic_weight: 20,
            lifestyle_weight: 30,
            neutral_score: 50,
            tip_threshold: 70,
            smoking_tip_threshold: 100,
            alcohol_tip_threshold: 70,
            max_tips: 5,
        }
    }
}

/// How profile strings are matched against catalog tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Case-insensitive containment in either direction ("shellfish" ~ "shellfish allergy")
    #[default]
    Substring,
    /// Case-insensitive equality of the trimmed strings
    Exact,
}

/// Supplement selection limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub max_recommendations: usize,
    /// Budget used by callers when a stored profile has none
    pub default_monthly_budget: f64,
    pub match_policy: MatchPolicy,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 5,
            default_monthly_budget: crate::models::DEFAULT_MONTHLY_BUDGET,
            match_policy: MatchPolicy::Substring,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let s = &self.scoring;
        let weight_sum = u64::from(s.biomarker_weight)
            + u64::from(s.genetic_weight)
            + u64::from(s.lifestyle_weight);
        if weight_sum != 100 {
            return Err(ConfigError::Invalid(format!(
                "score weights must sum to 100, got {}",
                weight_sum
            )));
        }
        if s.neutral_score > 100 {
            return Err(ConfigError::Invalid("neutral_score must be within 0-100".into()));
        }

        let r = &self.recommender;
        if !r.default_monthly_budget.is_finite() || r.default_monthly_budget < 0.0 {
            return Err(ConfigError::Invalid(
                "default_monthly_budget must be a non-negative number".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.scoring.max_tips, 5);
        assert_eq!(config.recommender.max_recommendations, 5);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{"recommender": {"match_policy": "exact", "max_recommendations": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.recommender.match_policy, MatchPolicy::Exact);
        assert_eq!(config.recommender.max_recommendations, 3);
        assert_eq!(config.recommender.default_monthly_budget, 100.0);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let err = EngineConfig::from_json_str(r#"{"scoring": {"biomarker_weight": 60}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_oversized_weights_are_rejected() {
        let err = EngineConfig::from_json_str(
            r#"{"scoring": {"biomarker_weight": 4294967295, "genetic_weight": 1, "lifestyle_weight": 100}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"scoring": {"tip_threshold": 60}}"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.scoring.tip_threshold, 60);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/engine.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
