//! Discrimination: how well scores rank readmitted patients above the rest
//!
//! - [`DiscriminationEvaluator::auc`]: area under the ROC curve via the
//!   Mann-Whitney U statistic. Tied scores receive mid-ranks, so a tied
//!   positive/negative pair counts one half. The statistic depends only on
//!   the ordering of scores, so raw and normalised scores give the same AUC.
//! - [`DiscriminationEvaluator::threshold_metrics`]: precision, recall and F1
//!   when every record scoring at or above a threshold is flagged.

use readmit_scoring::ScoredCohort;
use readmit_stats::rank::mid_ranks;
use serde::{Deserialize, Serialize};

use crate::DiscriminationError;

/// Confusion counts and derived metrics at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMetrics {
    pub threshold: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// `None` when the cohort has no negative outcomes.
    pub specificity: Option<f64>,
    /// Share of the cohort flagged at this threshold.
    pub predicted_positive_fraction: f64,
}

/// Result of one threshold in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThresholdOutcome {
    Defined(ThresholdMetrics),
    /// No record scored at or above the threshold, so precision is undefined.
    Undefined { threshold: f64 },
}

impl ThresholdOutcome {
    #[must_use]
    pub fn threshold(&self) -> f64 {
        match self {
            Self::Defined(metrics) => metrics.threshold,
            Self::Undefined { threshold } => *threshold,
        }
    }

    #[must_use]
    pub fn metrics(&self) -> Option<&ThresholdMetrics> {
        match self {
            Self::Defined(metrics) => Some(metrics),
            Self::Undefined { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscriminationEvaluator;

impl DiscriminationEvaluator {
    /// Probability that a random positive outranks a random negative.
    ///
    /// ```
    /// use readmit_analysis::discrimination::DiscriminationEvaluator;
    ///
    /// let scores = [10.0, 20.0, 20.0, 40.0];
    /// let outcomes = [false, true, false, true];
    /// // pairs (pos, neg): (20,10)=1 (20,20)=½ (40,10)=1 (40,20)=1
    /// assert_eq!(DiscriminationEvaluator::auc(&scores, &outcomes).unwrap(), 0.875);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn auc(scores: &[f64], outcomes: &[bool]) -> Result<f64, DiscriminationError> {
        check_lengths(scores, outcomes)?;
        let positives = outcomes.iter().filter(|&&o| o).count();
        let negatives = outcomes.len() - positives;
        if positives == 0 || negatives == 0 {
            return Err(DiscriminationError::DegenerateLabels {
                positives,
                negatives,
            });
        }

        let ranks = mid_ranks(scores);
        let positive_rank_sum = ranks
            .iter()
            .zip(outcomes)
            .filter(|(_, o)| **o)
            .map(|(rank, _)| rank)
            .sum::<f64>();
        let n_pos = positives as f64;
        let n_neg = negatives as f64;
        let u = positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0;
        Ok(u / (n_pos * n_neg))
    }

    /// AUC of a scored cohort's raw scores against its outcomes.
    pub fn cohort_auc(cohort: &ScoredCohort) -> Result<f64, DiscriminationError> {
        Self::auc(&score_values(cohort), &cohort.outcomes())
    }

    /// Sweeps `thresholds` in order, flagging records with `score >= threshold`.
    ///
    /// A threshold that flags no record yields
    /// [`ThresholdOutcome::Undefined`] in its position; the rest of the sweep
    /// is unaffected. A cohort without any positive outcome has no defined
    /// recall and fails as a whole.
    ///
    /// ```
    /// use readmit_analysis::discrimination::DiscriminationEvaluator;
    ///
    /// let scores = [10.0, 60.0, 70.0, 90.0];
    /// let outcomes = [false, false, true, true];
    /// let sweep = DiscriminationEvaluator::threshold_metrics(&scores, &outcomes, &[65.0, 95.0]).unwrap();
    /// let at_65 = sweep[0].metrics().unwrap();
    /// assert_eq!((at_65.precision, at_65.recall, at_65.f1), (1.0, 1.0, 1.0));
    /// assert!(sweep[1].is_undefined());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn threshold_metrics(
        scores: &[f64],
        outcomes: &[bool],
        thresholds: &[f64],
    ) -> Result<Vec<ThresholdOutcome>, DiscriminationError> {
        check_lengths(scores, outcomes)?;
        let positives = outcomes.iter().filter(|&&o| o).count();
        if positives == 0 {
            return Err(DiscriminationError::NoPositiveOutcomes);
        }
        let negatives = outcomes.len() - positives;
        let total = outcomes.len() as f64;

        let sweep = thresholds
            .iter()
            .map(|&threshold| {
                let (mut tp, mut fp) = (0, 0);
                for (&score, &outcome) in scores.iter().zip(outcomes) {
                    if score >= threshold {
                        if outcome {
                            tp += 1;
                        } else {
                            fp += 1;
                        }
                    }
                }
                let flagged = tp + fp;
                if flagged == 0 {
                    log::debug!("threshold {threshold}: no record flagged, metrics undefined");
                    return ThresholdOutcome::Undefined { threshold };
                }
                let fn_ = positives - tp;
                let tn = negatives - fp;
                let precision = tp as f64 / flagged as f64;
                let recall = tp as f64 / positives as f64;
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ThresholdOutcome::Defined(ThresholdMetrics {
                    threshold,
                    true_positives: tp,
                    false_positives: fp,
                    false_negatives: fn_,
                    true_negatives: tn,
                    precision,
                    recall,
                    f1,
                    specificity: (negatives > 0).then(|| tn as f64 / negatives as f64),
                    predicted_positive_fraction: flagged as f64 / total,
                })
            })
            .collect();
        Ok(sweep)
    }
}

/// Raw scores of a scored cohort as `f64`, in record order.
#[must_use]
pub fn score_values(cohort: &ScoredCohort) -> Vec<f64> {
    cohort
        .iter()
        .map(|r| f64::from(r.score.value()))
        .collect()
}

fn check_lengths(scores: &[f64], outcomes: &[bool]) -> Result<(), DiscriminationError> {
    if scores.len() == outcomes.len() {
        Ok(())
    } else {
        Err(DiscriminationError::LengthMismatch {
            scores: scores.len(),
            outcomes: outcomes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    const SCORES: [f64; 4] = [10.0, 20.0, 30.0, 40.0];

    #[test]
    fn test_auc_perfect_and_inverted() {
        let auc = DiscriminationEvaluator::auc(&SCORES, &[false, false, true, true]).unwrap();
        assert_eq!(auc, 1.0);
        let auc = DiscriminationEvaluator::auc(&SCORES, &[true, true, false, false]).unwrap();
        assert_eq!(auc, 0.0);
    }

    #[test]
    fn test_auc_all_tied_is_half() {
        let auc = DiscriminationEvaluator::auc(&[5.0; 6], &[true, false, true, false, false, true])
            .unwrap();
        assert_eq!(auc, 0.5);
    }

    #[test]
    fn test_auc_degenerate_labels() {
        assert_eq!(
            DiscriminationEvaluator::auc(&SCORES, &[true; 4]),
            Err(DiscriminationError::DegenerateLabels {
                positives: 4,
                negatives: 0
            })
        );
        assert!(
            DiscriminationEvaluator::auc(&SCORES, &[false; 4])
                .unwrap_err()
                .is_degenerate_labels()
        );
        assert!(
            DiscriminationEvaluator::auc(&[], &[])
                .unwrap_err()
                .is_degenerate_labels()
        );
        assert_eq!(
            DiscriminationEvaluator::auc(&SCORES, &[true, false]),
            Err(DiscriminationError::LengthMismatch {
                scores: 4,
                outcomes: 2
            })
        );
    }

    #[test]
    fn test_auc_matches_pairwise_count() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        for _ in 0..50 {
            let len = rng.random_range(2..60);
            let scores = (0..len)
                .map(|_| f64::from(rng.random_range(0..10_u32) * 10))
                .collect::<Vec<_>>();
            let mut outcomes = (0..len).map(|_| rng.random_bool(0.4)).collect::<Vec<_>>();
            outcomes[0] = true;
            outcomes[1] = false;

            let mut wins = 0.0;
            let mut pairs = 0.0;
            let positives = scores.iter().zip(&outcomes).filter(|(_, o)| **o);
            for (&pos, _) in positives {
                let negatives = scores.iter().zip(&outcomes).filter(|(_, o)| !**o);
                for (&neg, _) in negatives {
                    pairs += 1.0;
                    if pos > neg {
                        wins += 1.0;
                    } else if pos == neg {
                        wins += 0.5;
                    }
                }
            }
            let auc = DiscriminationEvaluator::auc(&scores, &outcomes).unwrap();
            assert!((auc - wins / pairs).abs() < 1e-12);

            // rank invariance under normalisation
            let normalized = scores.iter().map(|s| s / 90.0).collect::<Vec<_>>();
            let auc_norm = DiscriminationEvaluator::auc(&normalized, &outcomes).unwrap();
            assert!((auc - auc_norm).abs() < 1e-12);
        }
    }

    #[test]
    fn test_threshold_sweep() {
        let scores = [10.0, 60.0, 70.0, 90.0];
        let outcomes = [false, false, true, true];
        let sweep =
            DiscriminationEvaluator::threshold_metrics(&scores, &outcomes, &[50.0, 65.0, 100.0])
                .unwrap();
        assert_eq!(sweep.len(), 3);

        let at_50 = sweep[0].metrics().unwrap();
        assert_eq!(
            (at_50.true_positives, at_50.false_positives, at_50.false_negatives, at_50.true_negatives),
            (2, 1, 0, 1)
        );
        assert!((at_50.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(at_50.recall, 1.0);
        assert_eq!(at_50.specificity, Some(0.5));
        assert_eq!(at_50.predicted_positive_fraction, 0.75);

        let at_65 = sweep[1].metrics().unwrap();
        assert_eq!((at_65.precision, at_65.recall, at_65.f1), (1.0, 1.0, 1.0));

        assert_eq!(sweep[2], ThresholdOutcome::Undefined { threshold: 100.0 });
        assert_eq!(sweep[2].threshold(), 100.0);
    }

    #[test]
    fn test_threshold_sweep_without_positives() {
        assert_eq!(
            DiscriminationEvaluator::threshold_metrics(&SCORES, &[false; 4], &[20.0]),
            Err(DiscriminationError::NoPositiveOutcomes)
        );
        assert_eq!(
            DiscriminationEvaluator::threshold_metrics(&[], &[], &[20.0]),
            Err(DiscriminationError::NoPositiveOutcomes)
        );
    }

    #[test]
    fn test_all_positive_has_no_specificity() {
        let sweep =
            DiscriminationEvaluator::threshold_metrics(&SCORES, &[true; 4], &[30.0]).unwrap();
        let metrics = sweep[0].metrics().unwrap();
        assert_eq!(metrics.specificity, None);
        assert_eq!(metrics.recall, 0.5);
    }

    #[test]
    fn test_zero_precision_gives_zero_f1() {
        let sweep = DiscriminationEvaluator::threshold_metrics(
            &SCORES,
            &[true, false, false, false],
            &[30.0],
        )
        .unwrap();
        let metrics = sweep[0].metrics().unwrap();
        assert_eq!((metrics.precision, metrics.f1), (0.0, 0.0));
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let json = serde_json::to_value(ThresholdOutcome::Undefined { threshold: 75.0 }).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "undefined", "threshold": 75.0 }));
    }
}
