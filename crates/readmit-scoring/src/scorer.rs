use readmit_cohort::{Cohort, PatientRecord, PatientRecordInput, RecordError};
use serde::{Deserialize, Serialize};

use crate::{
    CategoryBounds, RiskCategory, StratifyError,
    indicator::{BoxedRiskIndicator, RiskIndicator, standard_indicators},
    stratify,
};

/// Composite readmission risk score.
///
/// A non-negative integer produced once per record by [`RiskScorer::score`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct RiskScore(u32);

impl RiskScore {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Score divided by `max_score`, in `[0.0, 1.0]` for scores produced by
    /// the same scorer. Returns `0.0` when `max_score` is zero.
    #[must_use]
    pub fn normalized(self, max_score: u32) -> f64 {
        if max_score == 0 {
            0.0
        } else {
            f64::from(self.0) / f64::from(max_score)
        }
    }
}

/// One indicator's share of a record's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub indicator: String,
    pub present: bool,
    pub weight: u32,
    pub points: u32,
}

/// Weighted-sum risk scorer.
///
/// ```
/// use readmit_cohort::PatientRecord;
/// use readmit_scoring::{RiskCategory, RiskScorer};
///
/// let scorer = RiskScorer::standard();
/// let record = PatientRecord::builder("P-1")
///     .age(82.0)            // +25
///     .condition_count(4)   // +20
///     .length_of_stay(9.0)  // +10
///     .build()
///     .unwrap();
/// let score = scorer.score(&record);
/// assert_eq!(score.value(), 55);
/// assert_eq!(scorer.categorize(score), RiskCategory::High);
/// assert_eq!(scorer.max_score(), 90);
/// ```
#[derive(Debug, Clone)]
pub struct RiskScorer {
    indicators: Vec<BoxedRiskIndicator>,
    bounds: CategoryBounds,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::standard()
    }
}

impl RiskScorer {
    /// The standard five-indicator scorer with default category bounds.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(standard_indicators())
    }

    #[must_use]
    pub fn new(indicators: Vec<BoxedRiskIndicator>) -> Self {
        Self {
            indicators,
            bounds: CategoryBounds::default(),
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: CategoryBounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn indicators(&self) -> &[BoxedRiskIndicator] {
        &self.indicators
    }

    #[must_use]
    pub fn bounds(&self) -> &CategoryBounds {
        &self.bounds
    }

    /// Highest score any record can reach: the sum of all weights, saturating
    /// at `u32::MAX`.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.indicators
            .iter()
            .map(RiskIndicator::weight)
            .fold(0, u32::saturating_add)
    }

    /// Sum of the weights of the indicators present in `record`, saturating
    /// at `u32::MAX` so that it never exceeds [`max_score`](Self::max_score).
    #[must_use]
    pub fn score(&self, record: &PatientRecord) -> RiskScore {
        RiskScore(
            self.indicators
                .iter()
                .map(|i| i.points(record))
                .fold(0, u32::saturating_add),
        )
    }

    /// Validates a raw input and scores it.
    pub fn score_input(&self, input: PatientRecordInput) -> Result<RiskScore, RecordError> {
        let record = PatientRecord::try_from(input)?;
        Ok(self.score(&record))
    }

    /// Per-indicator breakdown of a record's score, in indicator order.
    #[must_use]
    pub fn contributions(&self, record: &PatientRecord) -> Vec<Contribution> {
        self.indicators
            .iter()
            .map(|indicator| Contribution {
                indicator: indicator.id().to_owned(),
                present: indicator.is_present(record),
                weight: indicator.weight(),
                points: indicator.points(record),
            })
            .collect()
    }

    #[must_use]
    pub fn categorize(&self, score: RiskScore) -> RiskCategory {
        self.bounds.categorize(score)
    }

    /// Scores every record of a cohort and attaches its category.
    #[must_use]
    pub fn score_cohort(&self, cohort: Cohort) -> ScoredCohort {
        let records = cohort
            .into_records()
            .into_iter()
            .map(|record| {
                let score = self.score(&record);
                ScoredRecord {
                    category: self.categorize(score),
                    score,
                    record,
                }
            })
            .collect::<Vec<_>>();
        log::debug!(
            "scored {} records with {} indicators (max score {})",
            records.len(),
            self.indicators.len(),
            self.max_score()
        );
        ScoredCohort {
            records,
            max_score: self.max_score(),
            bounds: self.bounds,
        }
    }
}

/// A patient record with its score and category attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: PatientRecord,
    pub score: RiskScore,
    pub category: RiskCategory,
}

impl ScoredRecord {
    #[must_use]
    pub fn outcome(&self) -> bool {
        self.record.outcome()
    }
}

/// Output of [`RiskScorer::score_cohort`]: records in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCohort {
    records: Vec<ScoredRecord>,
    max_score: u32,
    bounds: CategoryBounds,
}

impl ScoredCohort {
    #[must_use]
    pub fn records(&self) -> &[ScoredRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredRecord> + '_ {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum score of the scorer that produced this cohort.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn bounds(&self) -> &CategoryBounds {
        &self.bounds
    }

    #[must_use]
    pub fn scores(&self) -> Vec<RiskScore> {
        self.records.iter().map(|r| r.score).collect()
    }

    #[must_use]
    pub fn outcomes(&self) -> Vec<bool> {
        self.records.iter().map(ScoredRecord::outcome).collect()
    }

    #[must_use]
    pub fn positives(&self) -> usize {
        self.records.iter().filter(|r| r.outcome()).count()
    }

    /// Decile (`1..=10`) of every record, parallel to [`records`](Self::records).
    pub fn deciles(&self) -> Result<Vec<usize>, StratifyError> {
        stratify::assign_deciles(&self.scores())
    }

    /// Equal-population bucket (`1..=num_buckets`) of every record.
    pub fn quantile_buckets(&self, num_buckets: usize) -> Result<Vec<usize>, StratifyError> {
        stratify::assign_quantile_buckets(&self.scores(), num_buckets)
    }
}
