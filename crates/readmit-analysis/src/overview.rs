//! Cohort-level score distribution

use readmit_scoring::ScoredCohort;
use readmit_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, summary::StratifiedSummary};

/// Percentile points reported for the score distribution.
pub const SCORE_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl From<DescriptiveStats> for ScoreStats {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub percentile: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortOverview {
    pub count: usize,
    pub positives: usize,
    pub observed_rate: f64,
    pub max_score: u32,
    pub score_stats: ScoreStats,
    pub score_percentiles: Vec<PercentileValue>,
    pub categories: StratifiedSummary,
}

impl CohortOverview {
    /// ```
    /// use readmit_analysis::overview::CohortOverview;
    /// use readmit_cohort::{Cohort, PatientRecord};
    /// use readmit_scoring::RiskScorer;
    ///
    /// let cohort = (0..10)
    ///     .map(|i| PatientRecord::builder(i.to_string()).prior_admissions(i).build().unwrap())
    ///     .collect::<Cohort>();
    /// let overview = CohortOverview::from_cohort(&RiskScorer::standard().score_cohort(cohort)).unwrap();
    /// assert_eq!(overview.score_stats.max, 20.0);
    /// assert_eq!(overview.score_stats.median, 20.0);
    /// ```
    pub fn from_cohort(cohort: &ScoredCohort) -> Result<Self, AnalysisError> {
        let categories = StratifiedSummary::by_category(cohort)?;
        let mut scores = cohort
            .iter()
            .map(|r| f64::from(r.score.value()))
            .collect::<Vec<_>>();
        scores.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&scores).ok_or(AnalysisError::EmptyCohort)?;
        let score_percentiles = SCORE_PERCENTILES
            .iter()
            .map(|&percentile| PercentileValue {
                percentile,
                value: nearest_rank(&scores, percentile),
            })
            .collect();
        Ok(Self {
            count: categories.count,
            positives: categories.positives,
            observed_rate: categories.observed_rate,
            max_score: cohort.max_score(),
            score_stats: stats.into(),
            score_percentiles,
            categories,
        })
    }
}

/// Score at `percentile` by the nearest-rank rule: the element at index
/// `floor(n * percentile / 100)`, clamped to the last one.
///
/// `sorted_scores` must be non-empty and ascending.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
fn nearest_rank(sorted_scores: &[f64], percentile: f64) -> f64 {
    let last = sorted_scores.len() - 1;
    let index = (sorted_scores.len() as f64 * percentile / 100.0) as usize;
    sorted_scores[index.min(last)]
}

#[cfg(test)]
mod tests {
    use readmit_cohort::{Cohort, PatientRecord};
    use readmit_scoring::{RiskCategory, RiskScorer};

    use super::*;
    use crate::summary::RiskBucket;

    #[test]
    fn test_overview_of_small_cohort() {
        let cohort = [
            PatientRecord::builder("a").build().unwrap(),
            PatientRecord::builder("b").age(80.0).build().unwrap(),
            PatientRecord::builder("c")
                .age(80.0)
                .condition_count(4)
                .prior_admissions(3)
                .outcome(true)
                .build()
                .unwrap(),
            PatientRecord::builder("d")
                .age(80.0)
                .condition_count(4)
                .prior_admissions(3)
                .emergency_visits_12m(5)
                .outcome(true)
                .build()
                .unwrap(),
        ]
        .into_iter()
        .collect::<Cohort>();
        let scored = RiskScorer::standard().score_cohort(cohort);
        let overview = CohortOverview::from_cohort(&scored).unwrap();

        assert_eq!(overview.count, 4);
        assert_eq!(overview.positives, 2);
        assert_eq!(overview.observed_rate, 0.5);
        assert_eq!(overview.max_score, 90);
        assert_eq!(overview.score_stats.min, 0.0);
        assert_eq!(overview.score_stats.max, 80.0);
        assert_eq!(overview.score_stats.mean, 42.5);
        assert_eq!(overview.score_stats.median, 45.0);
        assert_eq!(overview.score_percentiles.len(), SCORE_PERCENTILES.len());
        assert_eq!(overview.score_percentiles[2].value, 65.0);

        let counts = overview
            .categories
            .buckets
            .iter()
            .map(|b| (b.bucket, b.count))
            .collect::<Vec<_>>();
        let expected = RiskCategory::ALL.map(|c| (RiskBucket::Category(c), 1));
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_nearest_rank_on_score_ladder() {
        // Ten records scoring 0, 10, ..., 90.
        let scores = (0..10).map(|i| f64::from(i * 10)).collect::<Vec<_>>();
        assert_eq!(nearest_rank(&scores, 10.0), 10.0);
        assert_eq!(nearest_rank(&scores, 25.0), 20.0);
        assert_eq!(nearest_rank(&scores, 50.0), 50.0);
        assert_eq!(nearest_rank(&scores, 90.0), 90.0);
        assert_eq!(nearest_rank(&scores, 100.0), 90.0);
        assert_eq!(nearest_rank(&[45.0], 10.0), 45.0);
    }

    #[test]
    fn test_percentiles_follow_requested_points() {
        let cohort = (0..20)
            .map(|i| {
                PatientRecord::builder(format!("P-{i}"))
                    .age(if i < 5 { 80.0 } else { 50.0 })
                    .build()
                    .unwrap()
            })
            .collect::<Cohort>();
        let overview =
            CohortOverview::from_cohort(&RiskScorer::standard().score_cohort(cohort)).unwrap();
        let points = overview
            .score_percentiles
            .iter()
            .map(|p| (p.percentile, p.value))
            .collect::<Vec<_>>();
        assert_eq!(
            points,
            [(10.0, 0.0), (25.0, 0.0), (50.0, 0.0), (75.0, 25.0), (90.0, 25.0)]
        );
    }

    #[test]
    fn test_empty_cohort() {
        let scored = RiskScorer::standard().score_cohort(Cohort::default());
        assert_eq!(
            CohortOverview::from_cohort(&scored),
            Err(AnalysisError::EmptyCohort)
        );
    }
}
