use std::fmt;

use chrono::{DateTime, Utc};
use readmit_analysis::{
    calibration::CalibrationReport, discrimination::ThresholdOutcome, overview::CohortOverview,
    risk_factor::RiskFactorTable, summary::StratifiedSummary,
};
use readmit_scoring::ScoringConfig;
use serde::{Deserialize, Serialize};

/// A statistic that may be undefined for the evaluated cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Available { value: T },
    Unavailable { reason: String },
}

impl<T> Section<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available { .. } => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Section<T>
where
    E: fmt::Display,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Available { value },
            Err(err) => {
                log::warn!("statistic unavailable: {err}");
                Self::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Output of `readmit evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Timestamp when the report was generated (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Path of the evaluated cohort file
    pub cohort_file: String,
    pub scoring: ScoringConfig,
    pub overview: CohortOverview,
    /// Decile summary with the reference curve's predicted rates
    pub deciles: StratifiedSummary,
    pub calibration: Section<CalibrationReport>,
    pub auc: Section<f64>,
    pub threshold_sweep: Section<Vec<ThresholdOutcome>>,
    pub risk_factors: RiskFactorTable,
}

#[cfg(test)]
mod tests {
    use readmit_analysis::DiscriminationError;

    use super::*;

    #[test]
    fn test_unavailable_section_keeps_reason() {
        let section: Section<f64> = Err::<f64, _>(DiscriminationError::DegenerateLabels {
            positives: 0,
            negatives: 12,
        })
        .into();
        assert_eq!(section.value(), None);
        assert!(section.reason().unwrap().contains("0 positive"));
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert!(json["reason"].as_str().unwrap().contains("0 positive"));
    }

    #[test]
    fn test_available_section() {
        let section: Section<f64> = Ok::<_, DiscriminationError>(0.75).into();
        assert_eq!(section.value(), Some(&0.75));
        assert_eq!(section.reason(), None);
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "available", "value": 0.75 }));
    }
}
