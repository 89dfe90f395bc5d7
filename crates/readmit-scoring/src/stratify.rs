//! Risk stratification
//!
//! Two independent ways to bucket a scored cohort:
//!
//! - **Categories** ([`RiskCategory`]): fixed-width score ranges. The lower
//!   edge of each range is inclusive, the upper edge exclusive, and the last
//!   category is open-ended.
//! - **Quantile buckets** ([`assign_deciles`], [`assign_quantile_buckets`]):
//!   equal-population groups ranked by ascending score, numbered from 1.
//!   Records with equal scores keep their input order, so when a run of equal
//!   scores straddles a boundary the earlier records fall in the lower bucket.

use readmit_stats::binning::{bin_sizes, equal_population_bins};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, RiskScore, StratifyError};

/// Number of buckets used for decile analysis.
pub const DECILES: usize = 10;

/// Fixed-width risk category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

/// Lower edges of the Medium, High and Critical categories.
///
/// ```
/// use readmit_scoring::{CategoryBounds, RiskCategory, RiskScore};
///
/// let bounds = CategoryBounds::default();
/// assert_eq!(bounds.categorize(RiskScore::new(24)), RiskCategory::Low);
/// assert_eq!(bounds.categorize(RiskScore::new(25)), RiskCategory::Medium);
/// assert_eq!(bounds.categorize(RiskScore::new(75)), RiskCategory::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 3]", into = "[u32; 3]")]
pub struct CategoryBounds {
    medium: u32,
    high: u32,
    critical: u32,
}

impl Default for CategoryBounds {
    fn default() -> Self {
        Self {
            medium: 25,
            high: 50,
            critical: 75,
        }
    }
}

impl CategoryBounds {
    /// Creates bounds from the three lower edges, which must be strictly ascending.
    pub fn new(medium: u32, high: u32, critical: u32) -> Result<Self, ConfigError> {
        if medium == 0 || medium >= high || high >= critical {
            return Err(ConfigError::UnorderedBounds {
                medium,
                high,
                critical,
            });
        }
        Ok(Self {
            medium,
            high,
            critical,
        })
    }

    #[must_use]
    pub fn categorize(&self, score: RiskScore) -> RiskCategory {
        match score.value() {
            s if s >= self.critical => RiskCategory::Critical,
            s if s >= self.high => RiskCategory::High,
            s if s >= self.medium => RiskCategory::Medium,
            _ => RiskCategory::Low,
        }
    }

    /// Score range of a category as `(inclusive lower, exclusive upper)`.
    ///
    /// The upper edge is `None` for the open-ended top category.
    #[must_use]
    pub fn range(&self, category: RiskCategory) -> (u32, Option<u32>) {
        match category {
            RiskCategory::Low => (0, Some(self.medium)),
            RiskCategory::Medium => (self.medium, Some(self.high)),
            RiskCategory::High => (self.high, Some(self.critical)),
            RiskCategory::Critical => (self.critical, None),
        }
    }
}

impl TryFrom<[u32; 3]> for CategoryBounds {
    type Error = ConfigError;

    fn try_from([medium, high, critical]: [u32; 3]) -> Result<Self, Self::Error> {
        Self::new(medium, high, critical)
    }
}

impl From<CategoryBounds> for [u32; 3] {
    fn from(bounds: CategoryBounds) -> Self {
        [bounds.medium, bounds.high, bounds.critical]
    }
}

/// Categorizes a score with the default bounds `{[0,25), [25,50), [50,75), [75,∞)}`.
#[must_use]
pub fn categorize(score: RiskScore) -> RiskCategory {
    CategoryBounds::default().categorize(score)
}

/// Assigns each score a decile in `1..=10`.
///
/// The returned vector is parallel to `scores`.
///
/// ```
/// use readmit_scoring::{RiskScore, assign_deciles};
///
/// let scores = (0..20).map(RiskScore::new).collect::<Vec<_>>();
/// let deciles = assign_deciles(&scores).unwrap();
/// assert_eq!(deciles[0], 1);
/// assert_eq!(deciles[19], 10);
/// ```
pub fn assign_deciles(scores: &[RiskScore]) -> Result<Vec<usize>, StratifyError> {
    assign_quantile_buckets(scores, DECILES)
}

/// Assigns each score an equal-population bucket in `1..=num_buckets`.
///
/// Bucket populations differ by at most one record.
pub fn assign_quantile_buckets(
    scores: &[RiskScore],
    num_buckets: usize,
) -> Result<Vec<usize>, StratifyError> {
    if num_buckets == 0 {
        return Err(StratifyError::ZeroBuckets);
    }
    if scores.is_empty() {
        return Err(StratifyError::EmptyCohort);
    }
    log::debug!(
        "assigning {} scores to {num_buckets} buckets (sizes {:?})",
        scores.len(),
        bin_sizes(scores.len(), num_buckets)
    );
    Ok(equal_population_bins(scores, num_buckets)
        .into_iter()
        .map(|bin| bin + 1)
        .collect())
}
