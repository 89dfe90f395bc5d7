//! Calibration: agreement between predicted and observed rates
//!
//! Calibration is measured over a sequence of buckets, each carrying its size,
//! observed outcome rate and predicted rate. Three views are reported:
//!
//! - **Correlation**: Pearson correlation of predicted against observed rate,
//!   with a two-sided Student-t p-value on `n - 2` degrees of freedom.
//! - **Error**: mean absolute error and root mean squared error of
//!   `observed - predicted`, every bucket weighted equally.
//! - **Chi-square**: `Σ (O - E)² / E` with `O = observed_rate × size` and
//!   `E = predicted_rate × size`, on `buckets - 2` degrees of freedom.
//!
//! # Chi-square degrees of freedom
//!
//! Buckets whose expected count is zero cannot contribute to the statistic;
//! they are excluded and each one removes a degree of freedom. At least three
//! buckets must remain. The `buckets - 2` rule follows the Hosmer-Lemeshow
//! convention for grouped risk scores without refitting a model.

use readmit_scoring::ScoredCohort;
use readmit_stats::{
    correlation::{self, Correlation},
    distribution::chi_square_sf,
};
use serde::{Deserialize, Serialize};

use crate::{CalibrationError, summary::StratifiedSummary};

/// Minimum number of buckets with a non-zero expected count.
pub const MIN_CHI_SQUARE_BUCKETS: usize = 3;

/// Calibration input for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBucket {
    pub size: usize,
    pub observed_rate: f64,
    pub predicted_rate: f64,
}

/// Source of predicted rates for decile calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCurve {
    /// One predicted rate per bucket, lowest bucket first.
    Explicit(Vec<f64>),
    /// Bucket mean score divided by the scorer's maximum score.
    NormalizedScore,
}

impl ReferenceCurve {
    /// Writes predicted rates into `summary`.
    ///
    /// Empty buckets receive the explicit rate if one is given, and no rate
    /// under [`ReferenceCurve::NormalizedScore`].
    pub fn apply(
        &self,
        summary: &mut StratifiedSummary,
        max_score: u32,
    ) -> Result<(), CalibrationError> {
        match self {
            Self::Explicit(rates) => {
                if rates.len() != summary.buckets.len() {
                    return Err(CalibrationError::LengthMismatch {
                        expected: summary.buckets.len(),
                        actual: rates.len(),
                    });
                }
                for (bucket, &rate) in summary.buckets.iter_mut().zip(rates) {
                    bucket.predicted_rate = Some(rate);
                }
            }
            Self::NormalizedScore => {
                for bucket in &mut summary.buckets {
                    bucket.predicted_rate = bucket.mean_score.map(|mean| {
                        if max_score == 0 {
                            0.0
                        } else {
                            mean / f64::from(max_score)
                        }
                    });
                }
            }
        }
        Ok(())
    }
}

/// Serialisable form of [`Correlation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCorrelation {
    pub coefficient: f64,
    pub p_value: Option<f64>,
    pub sample_size: usize,
}

impl From<Correlation> for RateCorrelation {
    fn from(corr: Correlation) -> Self {
        Self {
            coefficient: corr.coefficient,
            p_value: corr.p_value,
            sample_size: corr.sample_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub degrees_of_freedom: u32,
    pub p_value: f64,
    /// Buckets left out because their expected count was zero.
    pub excluded_buckets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub buckets: Vec<CalibrationBucket>,
    /// `None` when either rate sequence has zero variance.
    pub correlation: Option<RateCorrelation>,
    pub mae: f64,
    pub rmse: f64,
    pub chi_square: ChiSquareTest,
}

/// Evaluates calibration of bucketed predictions.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationEvaluator {
    min_buckets: usize,
}

impl Default for CalibrationEvaluator {
    fn default() -> Self {
        Self {
            min_buckets: MIN_CHI_SQUARE_BUCKETS,
        }
    }
}

impl CalibrationEvaluator {
    /// Requires at least `min_buckets` buckets with a non-zero expected count.
    ///
    /// # Panics
    ///
    /// Panics if `min_buckets` is below [`MIN_CHI_SQUARE_BUCKETS`].
    #[must_use]
    pub fn with_min_buckets(min_buckets: usize) -> Self {
        assert!(
            min_buckets >= MIN_CHI_SQUARE_BUCKETS,
            "chi-square needs at least {MIN_CHI_SQUARE_BUCKETS} buckets"
        );
        Self { min_buckets }
    }

    /// Evaluates calibration over `buckets`.
    ///
    /// The report is all-or-nothing: if any statistic cannot be computed the
    /// whole evaluation fails.
    ///
    /// ```
    /// use readmit_analysis::calibration::{CalibrationBucket, CalibrationEvaluator};
    ///
    /// let buckets = [0.1, 0.2, 0.4, 0.6]
    ///     .map(|rate| CalibrationBucket { size: 50, observed_rate: rate, predicted_rate: rate });
    /// let report = CalibrationEvaluator::default().evaluate(&buckets).unwrap();
    /// assert_eq!(report.mae, 0.0);
    /// assert_eq!(report.rmse, 0.0);
    /// assert_eq!(report.chi_square.statistic, 0.0);
    /// assert!((report.correlation.unwrap().coefficient - 1.0).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(
        &self,
        buckets: &[CalibrationBucket],
    ) -> Result<CalibrationReport, CalibrationError> {
        for (index, bucket) in buckets.iter().enumerate() {
            check_rate(index, "observed", bucket.observed_rate)?;
            check_rate(index, "predicted", bucket.predicted_rate)?;
        }
        let chi_square = chi_square_test(buckets, self.min_buckets)?;

        let n = buckets.len() as f64;
        let errors = buckets
            .iter()
            .map(|b| b.observed_rate - b.predicted_rate)
            .collect::<Vec<_>>();
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
        let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();

        let predicted = buckets.iter().map(|b| b.predicted_rate).collect::<Vec<_>>();
        let observed = buckets.iter().map(|b| b.observed_rate).collect::<Vec<_>>();
        let correlation = correlation::pearson(&predicted, &observed).map(RateCorrelation::from);
        if correlation.is_none() {
            log::debug!("rate correlation undefined: zero variance in predicted or observed rates");
        }

        Ok(CalibrationReport {
            buckets: buckets.to_vec(),
            correlation,
            mae,
            rmse,
            chi_square,
        })
    }

    /// Evaluates decile calibration of a scored cohort against `reference`.
    ///
    /// Empty deciles are skipped. An empty cohort has no buckets and fails
    /// with [`CalibrationError::InsufficientBuckets`].
    pub fn evaluate_deciles(
        &self,
        cohort: &ScoredCohort,
        reference: &ReferenceCurve,
    ) -> Result<CalibrationReport, CalibrationError> {
        let Ok(mut summary) = StratifiedSummary::by_decile(cohort) else {
            return Err(CalibrationError::InsufficientBuckets { remaining: 0 });
        };
        reference.apply(&mut summary, cohort.max_score())?;
        self.evaluate(&buckets_from_summary(&summary))
    }
}

/// Calibration buckets for every non-empty bucket of `summary` that has a
/// predicted rate.
#[must_use]
pub fn buckets_from_summary(summary: &StratifiedSummary) -> Vec<CalibrationBucket> {
    summary
        .non_empty()
        .filter_map(|bucket| {
            Some(CalibrationBucket {
                size: bucket.count,
                observed_rate: bucket.observed_rate?,
                predicted_rate: bucket.predicted_rate?,
            })
        })
        .collect()
}

fn check_rate(bucket: usize, kind: &'static str, value: f64) -> Result<(), CalibrationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CalibrationError::InvalidRate {
            bucket,
            kind,
            value,
        })
    }
}

#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn chi_square_test(
    buckets: &[CalibrationBucket],
    min_buckets: usize,
) -> Result<ChiSquareTest, CalibrationError> {
    let mut statistic = 0.0;
    let mut excluded_buckets = 0;
    for bucket in buckets {
        let size = bucket.size as f64;
        let observed = bucket.observed_rate * size;
        let expected = bucket.predicted_rate * size;
        if expected == 0.0 {
            excluded_buckets += 1;
            continue;
        }
        statistic += (observed - expected).powi(2) / expected;
    }

    let remaining = buckets.len() - excluded_buckets;
    if remaining < min_buckets {
        return Err(CalibrationError::InsufficientBuckets { remaining });
    }
    if excluded_buckets > 0 {
        log::warn!("{excluded_buckets} calibration buckets excluded from chi-square: zero expected count");
    }

    let degrees_of_freedom = (remaining - 2) as u32;
    Ok(ChiSquareTest {
        statistic,
        degrees_of_freedom,
        p_value: chi_square_sf(statistic, degrees_of_freedom),
        excluded_buckets,
    })
}
