//! Equal-population binning
//!
//! This module partitions a dataset into a fixed number of ordered bins that
//! hold (as close as possible to) the same number of samples. It is the basis
//! for decile analysis, where a cohort is ranked by score and split into ten
//! groups of equal size.
//!
//! # Algorithm
//!
//! 1. Stable-sort sample indices by value ([`stable_order`])
//! 2. The sample at sorted position `p` (0-based) of `n` goes to bin
//!    `floor(p * num_bins / n)`
//!
//! Step 2 gives every bin either `floor(n / num_bins)` or `ceil(n / num_bins)`
//! samples, so bin sizes differ by at most one. When `n < num_bins` some bins
//! stay empty.
//!
//! # Ties
//!
//! Equal values that straddle a bin boundary are split by input order: the
//! earlier sample goes to the lower bin. Bins are therefore monotonic in value
//! (every value in bin `b` is `<=` every value in bin `b + 1`) but two bins may
//! share a boundary value.
//!
//! # Examples
//!
//! ```
//! use readmit_stats::binning::{bin_sizes, equal_population_bins};
//!
//! // Five equal scores across two bins: the first three inputs go low
//! let values = [7, 7, 7, 7, 7];
//! assert_eq!(equal_population_bins(&values, 2), vec![0, 0, 0, 1, 1]);
//! assert_eq!(bin_sizes(5, 2), vec![3, 2]);
//! ```

use crate::rank::stable_order;

/// Returns the 0-based bin of the sample at sorted `position` out of `len`.
///
/// # Panics
///
/// Panics if `num_bins` is zero or `position >= len`.
#[must_use]
pub fn bin_of_position(position: usize, len: usize, num_bins: usize) -> usize {
    assert!(num_bins > 0, "num_bins must be positive");
    assert!(position < len, "position out of range");
    position * num_bins / len
}

/// Returns the number of samples that land in each bin.
///
/// # Panics
///
/// Panics if `num_bins` is zero.
///
/// # Examples
///
/// ```
/// use readmit_stats::binning::bin_sizes;
///
/// assert_eq!(bin_sizes(23, 10), vec![3, 2, 2, 3, 2, 2, 3, 2, 2, 2]);
/// ```
#[must_use]
pub fn bin_sizes(len: usize, num_bins: usize) -> Vec<usize> {
    assert!(num_bins > 0, "num_bins must be positive");
    let mut sizes = vec![0; num_bins];
    for position in 0..len {
        sizes[bin_of_position(position, len, num_bins)] += 1;
    }
    sizes
}

/// Assigns each value a 0-based equal-population bin.
///
/// The returned vector is parallel to `values`. See the module documentation
/// for the assignment rule and tie handling. An empty input yields an empty
/// assignment.
///
/// # Panics
///
/// Panics if `num_bins` is zero.
#[must_use]
pub fn equal_population_bins<K>(values: &[K], num_bins: usize) -> Vec<usize>
where
    K: Ord,
{
    assert!(num_bins > 0, "num_bins must be positive");
    let len = values.len();
    let mut bins = vec![0; len];
    for (position, idx) in stable_order(values).into_iter().enumerate() {
        bins[idx] = bin_of_position(position, len, num_bins);
    }
    bins
}
