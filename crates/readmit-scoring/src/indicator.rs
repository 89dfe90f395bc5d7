//! Risk indicators
//!
//! An indicator is a boolean test on a [`PatientRecord`] with an integer
//! weight. The composite risk score is always the sum of the weights of the
//! indicators that are present; there are no interaction terms, so adding an
//! indicator never changes how the others contribute.
//!
//! # Standard indicators
//!
//! | id | condition | weight |
//! |---|---|---|
//! | `advanced_age` | age > 75 | 25 |
//! | `multi_morbidity` | condition count ≥ 3 | 20 |
//! | `frequent_admissions` | prior admissions > 2 | 20 |
//! | `frequent_ed_use` | ED visits in 12 months > 3 | 15 |
//! | `extended_stay` | length of stay > 7 | 10 |

use std::fmt;

use readmit_cohort::{Comorbidity, NumericField, PatientRecord};
use serde::{Deserialize, Serialize};

/// The five weighted indicators of the standard readmission score.
#[must_use]
pub fn standard_indicators() -> Vec<BoxedRiskIndicator> {
    vec![
        Box::new(ThresholdIndicator::advanced_age()),
        Box::new(ThresholdIndicator::multi_morbidity()),
        Box::new(ThresholdIndicator::frequent_admissions()),
        Box::new(ThresholdIndicator::frequent_ed_use()),
        Box::new(ThresholdIndicator::extended_stay()),
    ]
}

/// One zero-weight indicator per comorbidity flag.
///
/// These do not contribute to the standard score but are useful for
/// risk-factor analysis.
#[must_use]
pub fn comorbidity_indicators() -> Vec<BoxedRiskIndicator> {
    Comorbidity::ALL
        .into_iter()
        .map(|flag| Box::new(ComorbidityIndicator::new(flag, 0)) as BoxedRiskIndicator)
        .collect()
}

pub trait RiskIndicator: fmt::Debug + Send + Sync {
    /// Stable machine-readable identifier.
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    /// Points added to the score when the indicator is present.
    #[must_use]
    fn weight(&self) -> u32;
    #[must_use]
    fn clone_boxed(&self) -> BoxedRiskIndicator;
    #[must_use]
    fn is_present(&self, record: &PatientRecord) -> bool;

    /// The indicator's contribution to the composite score: its weight when
    /// present, zero otherwise.
    #[must_use]
    fn points(&self, record: &PatientRecord) -> u32 {
        if self.is_present(record) {
            self.weight()
        } else {
            0
        }
    }
}

pub type BoxedRiskIndicator = Box<dyn RiskIndicator>;

impl Clone for BoxedRiskIndicator {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl RiskIndicator for BoxedRiskIndicator {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn weight(&self) -> u32 {
        self.as_ref().weight()
    }

    fn clone_boxed(&self) -> BoxedRiskIndicator {
        self.as_ref().clone_boxed()
    }

    fn is_present(&self, record: &PatientRecord) -> bool {
        self.as_ref().is_present(record)
    }
}

/// How a numeric field is compared against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Comparison {
    /// `value > threshold`
    #[serde(rename = "gt")]
    #[display(">")]
    GreaterThan,
    /// `value >= threshold`
    #[serde(rename = "ge")]
    #[display(">=")]
    AtLeast,
}

impl Comparison {
    #[must_use]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::AtLeast => value >= threshold,
        }
    }
}

/// Present when a numeric field crosses a fixed threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdIndicator {
    pub id: String,
    pub name: String,
    pub field: NumericField,
    pub comparison: Comparison,
    pub threshold: f64,
    pub weight: u32,
}

impl ThresholdIndicator {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        field: NumericField,
        comparison: Comparison,
        threshold: f64,
        weight: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field,
            comparison,
            threshold,
            weight,
        }
    }

    /// Age over 75 years.
    #[must_use]
    pub fn advanced_age() -> Self {
        Self::new(
            "advanced_age",
            "Advanced age",
            NumericField::Age,
            Comparison::GreaterThan,
            75.0,
            25,
        )
    }

    /// Three or more chronic conditions.
    #[must_use]
    pub fn multi_morbidity() -> Self {
        Self::new(
            "multi_morbidity",
            "Multi-morbidity",
            NumericField::ConditionCount,
            Comparison::AtLeast,
            3.0,
            20,
        )
    }

    /// More than two admissions in the previous 12 months.
    #[must_use]
    pub fn frequent_admissions() -> Self {
        Self::new(
            "frequent_admissions",
            "Frequent prior admission",
            NumericField::PriorAdmissions,
            Comparison::GreaterThan,
            2.0,
            20,
        )
    }

    /// More than three emergency visits in the previous 12 months.
    #[must_use]
    pub fn frequent_ed_use() -> Self {
        Self::new(
            "frequent_ed_use",
            "Frequent ED use",
            NumericField::EmergencyVisits12m,
            Comparison::GreaterThan,
            3.0,
            15,
        )
    }

    /// Index stay longer than seven days.
    #[must_use]
    pub fn extended_stay() -> Self {
        Self::new(
            "extended_stay",
            "Extended stay",
            NumericField::LengthOfStay,
            Comparison::GreaterThan,
            7.0,
            10,
        )
    }
}

impl RiskIndicator for ThresholdIndicator {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn weight(&self) -> u32 {
        self.weight
    }
    fn clone_boxed(&self) -> BoxedRiskIndicator {
        Box::new(self.clone())
    }
    fn is_present(&self, record: &PatientRecord) -> bool {
        self.comparison
            .holds(record.numeric(self.field), self.threshold)
    }
}

/// Present when a comorbidity flag is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComorbidityIndicator {
    pub condition: Comorbidity,
    #[serde(default)]
    pub weight: u32,
}

impl ComorbidityIndicator {
    #[must_use]
    pub fn new(condition: Comorbidity, weight: u32) -> Self {
        Self { condition, weight }
    }
}

impl RiskIndicator for ComorbidityIndicator {
    fn id(&self) -> &str {
        self.condition.as_str()
    }
    fn name(&self) -> &str {
        self.condition.label()
    }
    fn weight(&self) -> u32 {
        self.weight
    }
    fn clone_boxed(&self) -> BoxedRiskIndicator {
        Box::new(self.clone())
    }
    fn is_present(&self, record: &PatientRecord) -> bool {
        record.has(self.condition)
    }
}
