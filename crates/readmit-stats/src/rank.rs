//! Orderings and ranks
//!
//! Sorting permutations here are always stable: values that compare equal keep
//! their input order. Binning and rank statistics build on this so that their
//! results never depend on hidden state such as a random seed.

use std::cmp::Ordering;

/// Returns the permutation that sorts `values` in ascending order.
///
/// Equal values keep their relative input order.
///
/// # Examples
///
/// ```
/// use readmit_stats::rank::stable_order;
///
/// let order = stable_order(&[30, 10, 30, 20]);
/// assert_eq!(order, vec![1, 3, 0, 2]);
/// ```
#[must_use]
pub fn stable_order<K>(values: &[K]) -> Vec<usize>
where
    K: Ord,
{
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].cmp(&values[b]));
    order
}

/// Assigns 1-based mid-ranks to `values`.
///
/// Tied values all receive the mean of the ranks they jointly occupy, so
/// `[10.0, 20.0, 20.0, 30.0]` ranks as `[1.0, 2.5, 2.5, 4.0]`. NaN values sort
/// after every other value (via [`f64::total_cmp`]).
///
/// # Examples
///
/// ```
/// use readmit_stats::rank::mid_ranks;
///
/// let ranks = mid_ranks(&[20.0, 10.0, 20.0, 30.0]);
/// assert_eq!(ranks, vec![2.5, 1.0, 2.5, 4.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mid_ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len()
            && values[order[end]].total_cmp(&values[order[start]]) == Ordering::Equal
        {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}
