//! Statistical primitives for readmission risk evaluation.
//!
//! This crate provides the numeric building blocks used by the scoring and
//! analysis crates. It has no dependencies and performs no I/O.
//!
//! - **Descriptive statistics**: min, max, mean, median, variance, standard deviation
//! - **Binning**: equal-population partitioning with stable tie-breaking
//! - **Ranks**: stable orderings and mid-rank assignment for tied values
//! - **Correlation**: Pearson coefficient with a two-sided significance test
//! - **Distributions**: chi-square and Student-t tail probabilities
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`binning`]: Equal-population bins (deciles, quintiles, ...)
//! - [`rank`]: Sorting permutations and mid-ranks
//! - [`correlation`]: Pearson correlation
//! - [`distribution`]: Special functions and distribution tails
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use readmit_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Splitting values into equal-population bins
//!
//! ```
//! use readmit_stats::binning::equal_population_bins;
//!
//! let values = [40, 10, 30, 20];
//! let bins = equal_population_bins(&values, 2);
//! assert_eq!(bins, vec![1, 0, 1, 0]);
//! ```
//!
//! ## Testing a correlation
//!
//! ```
//! use readmit_stats::correlation::pearson;
//!
//! let x = [0.1, 0.2, 0.3, 0.4];
//! let y = [0.12, 0.19, 0.33, 0.41];
//! let corr = pearson(&x, &y).unwrap();
//! assert!(corr.coefficient > 0.9);
//! ```

pub mod binning;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod rank;
