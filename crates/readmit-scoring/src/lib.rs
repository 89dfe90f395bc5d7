//! Rule-based 30-day readmission risk scoring.
//!
//! A [`RiskScorer`] holds an ordered list of [`RiskIndicator`]s. Scoring a
//! record sums the weights of the indicators present in it, yielding a
//! [`RiskScore`]. Scores are then stratified two ways:
//!
//! - into fixed-width [`RiskCategory`] ranges via [`CategoryBounds`]
//! - into equal-population buckets via [`assign_deciles`] and
//!   [`assign_quantile_buckets`]
//!
//! The indicator set and category bounds can be loaded from JSON through
//! [`ScoringConfig`].
//!
//! # Examples
//!
//! ```
//! use readmit_cohort::{Cohort, PatientRecord};
//! use readmit_scoring::{RiskCategory, RiskScorer};
//!
//! let cohort = [
//!     PatientRecord::builder("A").age(80.0).prior_admissions(4).build().unwrap(),
//!     PatientRecord::builder("B").age(40.0).build().unwrap(),
//! ]
//! .into_iter()
//! .collect::<Cohort>();
//!
//! let scored = RiskScorer::standard().score_cohort(cohort);
//! assert_eq!(scored.records()[0].score.value(), 45);
//! assert_eq!(scored.records()[0].category, RiskCategory::Medium);
//! assert_eq!(scored.records()[1].category, RiskCategory::Low);
//! ```

pub use self::{config::*, indicator::*, scorer::*, stratify::*};

pub mod config;
pub mod indicator;
pub mod scorer;
pub mod stratify;

/// A scoring configuration is unusable.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("scoring configuration has no indicators")]
    NoIndicators,
    #[display("indicator id must not be empty")]
    EmptyIndicatorId,
    #[display("indicator '{id}' is defined more than once")]
    DuplicateIndicator { id: String },
    #[display("indicator '{id}' has a negative or non-finite threshold")]
    InvalidThreshold { id: String },
    #[display("indicator weights add up to more than {}", u32::MAX)]
    WeightOverflow,
    #[display(
        "category bounds must be positive and strictly ascending, got {medium}, {high}, {critical}"
    )]
    UnorderedBounds { medium: u32, high: u32, critical: u32 },
}

/// Scores could not be split into quantile buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StratifyError {
    #[display("cannot stratify an empty cohort")]
    EmptyCohort,
    #[display("number of buckets must be positive")]
    ZeroBuckets,
}
