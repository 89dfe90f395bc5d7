//! Evaluation of readmission risk scores against observed outcomes.
//!
//! Every analysis borrows a cohort immutably and returns a freshly built,
//! serialisable result. Nothing is cached between calls.
//!
//! # Modules
//!
//! - [`summary`]: per-bucket outcome summaries for categories and deciles
//! - [`calibration`]: agreement between predicted and observed rates
//! - [`discrimination`]: AUC and threshold sweeps
//! - [`risk_factor`]: prevalence and conditional outcome rate per indicator
//! - [`overview`]: cohort-level score distribution
//!
//! # Errors
//!
//! Input problems ([`AnalysisError`]) and statistical degeneracy
//! ([`CalibrationError`], [`DiscriminationError`]) are separate types so that
//! callers can report an undefined statistic without treating the input as
//! broken.
//!
//! # Examples
//!
//! ```
//! use readmit_analysis::discrimination::DiscriminationEvaluator;
//!
//! let scores = [10.0, 20.0, 30.0, 40.0];
//! let outcomes = [false, false, true, true];
//! let auc = DiscriminationEvaluator::auc(&scores, &outcomes).unwrap();
//! assert_eq!(auc, 1.0);
//! ```

pub mod calibration;
pub mod discrimination;
pub mod overview;
pub mod risk_factor;
pub mod summary;

/// The cohort cannot be analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("cannot analyse an empty cohort")]
    EmptyCohort,
}

/// Calibration statistics are undefined for the given buckets.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum CalibrationError {
    #[display("too few buckets with a non-zero expected count for chi-square: {remaining}")]
    InsufficientBuckets { remaining: usize },
    #[display("bucket {bucket} has invalid {kind} rate {value}; rates must lie in [0, 1]")]
    InvalidRate {
        bucket: usize,
        kind: &'static str,
        value: f64,
    },
    #[display("expected {expected} reference rates, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Discrimination statistics are undefined for the given outcomes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum DiscriminationError {
    #[display("AUC needs both outcome classes, got {positives} positive and {negatives} negative")]
    DegenerateLabels { positives: usize, negatives: usize },
    #[display("no positive outcomes in the cohort")]
    NoPositiveOutcomes,
    #[display("got {scores} scores but {outcomes} outcomes")]
    LengthMismatch { scores: usize, outcomes: usize },
}
