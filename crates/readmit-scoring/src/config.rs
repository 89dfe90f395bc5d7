//! JSON-loadable scoring configuration
//!
//! ```json
//! {
//!   "indicators": [
//!     { "kind": "threshold", "id": "advanced_age", "name": "Advanced age",
//!       "field": "age", "comparison": "gt", "threshold": 75.0, "weight": 25 },
//!     { "kind": "comorbidity", "condition": "copd", "weight": 5 }
//!   ],
//!   "category_bounds": [25, 50, 75]
//! }
//! ```
//!
//! `category_bounds` may be omitted, in which case the default bounds apply.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    CategoryBounds, ConfigError, RiskScorer,
    indicator::{BoxedRiskIndicator, ComorbidityIndicator, RiskIndicator, ThresholdIndicator},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorConfig {
    Threshold(ThresholdIndicator),
    Comorbidity(ComorbidityIndicator),
}

impl IndicatorConfig {
    #[must_use]
    pub fn to_indicator(&self) -> BoxedRiskIndicator {
        match self {
            Self::Threshold(indicator) => Box::new(indicator.clone()),
            Self::Comorbidity(indicator) => Box::new(indicator.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    pub indicators: Vec<IndicatorConfig>,
    #[serde(default)]
    pub category_bounds: CategoryBounds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            indicators: vec![
                IndicatorConfig::Threshold(ThresholdIndicator::advanced_age()),
                IndicatorConfig::Threshold(ThresholdIndicator::multi_morbidity()),
                IndicatorConfig::Threshold(ThresholdIndicator::frequent_admissions()),
                IndicatorConfig::Threshold(ThresholdIndicator::frequent_ed_use()),
                IndicatorConfig::Threshold(ThresholdIndicator::extended_stay()),
            ],
            category_bounds: CategoryBounds::default(),
        }
    }
}

impl ScoringConfig {
    /// Checks that indicator ids are non-empty and unique, that every
    /// threshold is finite and non-negative, and that the total weight fits
    /// in a score.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indicators.is_empty() {
            return Err(ConfigError::NoIndicators);
        }
        let mut seen = HashSet::new();
        let mut total_weight = 0_u32;
        for config in &self.indicators {
            let indicator = config.to_indicator();
            let id = indicator.id();
            if id.trim().is_empty() {
                return Err(ConfigError::EmptyIndicatorId);
            }
            if !seen.insert(id.to_owned()) {
                return Err(ConfigError::DuplicateIndicator { id: id.to_owned() });
            }
            if let IndicatorConfig::Threshold(threshold) = config
                && !(threshold.threshold.is_finite() && threshold.threshold >= 0.0)
            {
                return Err(ConfigError::InvalidThreshold { id: id.to_owned() });
            }
            total_weight = total_weight
                .checked_add(indicator.weight())
                .ok_or(ConfigError::WeightOverflow)?;
        }
        Ok(())
    }

    /// Validates the configuration and builds a scorer from it.
    pub fn build_scorer(&self) -> Result<RiskScorer, ConfigError> {
        self.validate()?;
        let indicators = self
            .indicators
            .iter()
            .map(IndicatorConfig::to_indicator)
            .collect();
        log::debug!(
            "built scorer with {} indicators and bounds {:?}",
            self.indicators.len(),
            <[u32; 3]>::from(self.category_bounds)
        );
        Ok(RiskScorer::new(indicators).with_bounds(self.category_bounds))
    }
}

#[cfg(test)]
mod tests {
    use readmit_cohort::{Comorbidity, NumericField, PatientRecord};

    use super::*;
    use crate::{RiskCategory, indicator::Comparison};

    #[test]
    fn test_default_config_matches_standard_scorer() {
        let scorer = ScoringConfig::default().build_scorer().unwrap();
        let standard = RiskScorer::standard();
        let ids = |s: &RiskScorer| {
            s.indicators()
                .iter()
                .map(|i| (i.id().to_owned(), i.weight()))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&scorer), ids(&standard));
        assert_eq!(scorer.bounds(), standard.bounds());
    }

    #[test]
    fn test_parse_json_config() {
        let json = r#"{
            "indicators": [
                { "kind": "threshold", "id": "old", "name": "Old", "field": "age",
                  "comparison": "ge", "threshold": 65, "weight": 30 },
                { "kind": "comorbidity", "condition": "heart_disease", "weight": 15 }
            ],
            "category_bounds": [10, 30, 40]
        }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.indicators[0],
            IndicatorConfig::Threshold(ThresholdIndicator::new(
                "old",
                "Old",
                NumericField::Age,
                Comparison::AtLeast,
                65.0,
                30
            ))
        );

        let scorer = config.build_scorer().unwrap();
        assert_eq!(scorer.max_score(), 45);
        let record = PatientRecord::builder("a")
            .age(65.0)
            .comorbidity(Comorbidity::HeartDisease, true)
            .build()
            .unwrap();
        let score = scorer.score(&record);
        assert_eq!(score.value(), 45);
        assert_eq!(scorer.categorize(score), RiskCategory::Critical);
    }

    #[test]
    fn test_missing_bounds_use_default() {
        let json = r#"{ "indicators": [ { "kind": "comorbidity", "condition": "copd" } ] }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.category_bounds, CategoryBounds::default());
        assert_eq!(config.build_scorer().unwrap().max_score(), 0);
    }

    #[test]
    fn test_invalid_configs() {
        let empty = ScoringConfig {
            indicators: vec![],
            category_bounds: CategoryBounds::default(),
        };
        assert_eq!(empty.validate(), Err(ConfigError::NoIndicators));

        let mut duplicate = ScoringConfig::default();
        duplicate
            .indicators
            .push(IndicatorConfig::Threshold(ThresholdIndicator::advanced_age()));
        assert_eq!(
            duplicate.validate(),
            Err(ConfigError::DuplicateIndicator {
                id: "advanced_age".into()
            })
        );

        let mut nan = ThresholdIndicator::extended_stay();
        nan.threshold = f64::NAN;
        let config = ScoringConfig {
            indicators: vec![IndicatorConfig::Threshold(nan)],
            category_bounds: CategoryBounds::default(),
        };
        assert!(matches!(
            config.build_scorer(),
            Err(ConfigError::InvalidThreshold { .. })
        ));

        let mut blank = ThresholdIndicator::extended_stay();
        blank.id = "  ".into();
        let config = ScoringConfig {
            indicators: vec![IndicatorConfig::Threshold(blank)],
            category_bounds: CategoryBounds::default(),
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyIndicatorId));

        let unknown = r#"{ "indicators": [], "bounds": [1, 2, 3] }"#;
        assert!(serde_json::from_str::<ScoringConfig>(unknown).is_err());
    }

    #[test]
    fn test_total_weight_must_fit_in_score() {
        let json = r#"{ "indicators": [
            { "kind": "comorbidity", "condition": "copd", "weight": 4000000000 },
            { "kind": "comorbidity", "condition": "diabetes", "weight": 4000000000 }
        ] }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::WeightOverflow));
        assert!(matches!(
            config.build_scorer(),
            Err(ConfigError::WeightOverflow)
        ));

        let json = r#"{ "indicators": [
            { "kind": "comorbidity", "condition": "copd", "weight": 4294967295 }
        ] }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.build_scorer().unwrap().max_score(), u32::MAX);
    }
}
