//! Per-bucket outcome summaries
//!
//! A scored cohort is partitioned either by [`RiskCategory`] or by
//! equal-population decile, and each bucket is summarised by its size, the
//! observed readmission rate and the mean score. Buckets are listed in
//! ascending score order and empty buckets are kept so that the layout of a
//! summary does not depend on the cohort.

use readmit_scoring::{DECILES, RiskCategory, ScoredCohort, ScoredRecord};
use readmit_stats::descriptive;
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Identifies one bucket of a partitioned cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum RiskBucket {
    #[display("{_0}")]
    Category(RiskCategory),
    /// Decile index, `1..=10`.
    #[display("D{_0}")]
    Decile(usize),
}

/// Outcome summary of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub bucket: RiskBucket,
    pub count: usize,
    pub positives: usize,
    /// `positives / count`; `None` for an empty bucket.
    pub observed_rate: Option<f64>,
    pub mean_score: Option<f64>,
    pub min_score: Option<u32>,
    pub max_score: Option<u32>,
    /// Rate expected by a reference curve, when one has been applied.
    pub predicted_rate: Option<f64>,
    /// Observed rate relative to the cohort rate.
    pub lift: Option<f64>,
}

impl EvaluationSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A cohort summarised bucket by bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratifiedSummary {
    pub count: usize,
    pub positives: usize,
    pub observed_rate: f64,
    pub buckets: Vec<EvaluationSummary>,
}

impl StratifiedSummary {
    /// Summarises the cohort by risk category, Low to Critical.
    ///
    /// ```
    /// use readmit_analysis::summary::StratifiedSummary;
    /// use readmit_cohort::{Cohort, PatientRecord};
    /// use readmit_scoring::RiskScorer;
    ///
    /// let cohort = [
    ///     PatientRecord::builder("a").age(80.0).outcome(true).build().unwrap(),
    ///     PatientRecord::builder("b").build().unwrap(),
    /// ]
    /// .into_iter()
    /// .collect::<Cohort>();
    /// let scored = RiskScorer::standard().score_cohort(cohort);
    ///
    /// let summary = StratifiedSummary::by_category(&scored).unwrap();
    /// assert_eq!(summary.buckets.len(), 4);
    /// assert_eq!(summary.buckets[1].observed_rate, Some(1.0));
    /// assert_eq!(summary.buckets[2].observed_rate, None);
    /// ```
    pub fn by_category(cohort: &ScoredCohort) -> Result<Self, AnalysisError> {
        if cohort.is_empty() {
            return Err(AnalysisError::EmptyCohort);
        }
        let groups = RiskCategory::ALL
            .into_iter()
            .map(|category| {
                let members = cohort
                    .iter()
                    .filter(|r| r.category == category)
                    .collect::<Vec<_>>();
                (RiskBucket::Category(category), members)
            })
            .collect::<Vec<_>>();
        Ok(Self::from_groups(cohort, groups))
    }

    /// Summarises the cohort by score decile, D1 (lowest) to D10.
    pub fn by_decile(cohort: &ScoredCohort) -> Result<Self, AnalysisError> {
        let deciles = cohort
            .deciles()
            .map_err(|_| AnalysisError::EmptyCohort)?;
        let mut groups = (1..=DECILES)
            .map(|decile| (RiskBucket::Decile(decile), Vec::new()))
            .collect::<Vec<_>>();
        for (record, decile) in cohort.iter().zip(deciles) {
            groups[decile - 1].1.push(record);
        }
        Ok(Self::from_groups(cohort, groups))
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_groups(cohort: &ScoredCohort, groups: Vec<(RiskBucket, Vec<&ScoredRecord>)>) -> Self {
        let count = cohort.len();
        let positives = cohort.positives();
        let observed_rate = positives as f64 / count as f64;
        let buckets = groups
            .into_iter()
            .map(|(bucket, members)| summarize_bucket(bucket, &members, observed_rate))
            .collect::<Vec<_>>();
        log::debug!(
            "bucket sizes: {:?}",
            buckets.iter().map(|b| b.count).collect::<Vec<_>>()
        );
        Self {
            count,
            positives,
            observed_rate,
            buckets,
        }
    }

    /// Non-empty buckets only.
    pub fn non_empty(&self) -> impl Iterator<Item = &EvaluationSummary> + '_ {
        self.buckets.iter().filter(|b| !b.is_empty())
    }
}

#[expect(clippy::cast_precision_loss)]
fn summarize_bucket(
    bucket: RiskBucket,
    members: &[&ScoredRecord],
    cohort_rate: f64,
) -> EvaluationSummary {
    let count = members.len();
    let positives = members.iter().filter(|r| r.outcome()).count();
    let observed_rate = (count > 0).then(|| positives as f64 / count as f64);
    let scores = members
        .iter()
        .map(|r| f64::from(r.score.value()))
        .collect::<Vec<_>>();
    let lift = observed_rate
        .filter(|_| cohort_rate > 0.0)
        .map(|rate| rate / cohort_rate);
    EvaluationSummary {
        bucket,
        count,
        positives,
        observed_rate,
        mean_score: descriptive::mean(&scores),
        min_score: members.iter().map(|r| r.score.value()).min(),
        max_score: members.iter().map(|r| r.score.value()).max(),
        predicted_rate: None,
        lift,
    }
}
