//! Validated cohorts
//!
//! A [`Cohort`] is the finite set of records under evaluation at one time.
//! Assembling one from raw inputs is all-or-nothing: the first invalid record
//! aborts the whole cohort, because dropping records silently would bias any
//! rate computed over the remainder.

use serde::{Deserialize, Serialize};

use crate::{CohortError, PatientRecord, PatientRecordInput};

/// An immutable, validated set of patient records in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    records: Vec<PatientRecord>,
}

impl Cohort {
    #[must_use]
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    /// Validates every input, keeping input order.
    ///
    /// ```
    /// use readmit_cohort::{Cohort, CohortError, PatientRecord, PatientRecordInput};
    ///
    /// let good: PatientRecordInput = PatientRecord::builder("A").build().unwrap().into();
    /// let mut bad = good.clone();
    /// bad.patient_id = Some("B".into());
    /// bad.age = Some(-3.0);
    ///
    /// let err = Cohort::from_inputs(vec![good, bad]).unwrap_err();
    /// let CohortError::InvalidRecord { index, patient_id, .. } = err;
    /// assert_eq!((index, patient_id.as_str()), (1, "B"));
    /// ```
    pub fn from_inputs<I>(inputs: I) -> Result<Self, CohortError>
    where
        I: IntoIterator<Item = PatientRecordInput>,
    {
        let records = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let patient_id = input
                    .patient_id
                    .clone()
                    .unwrap_or_else(|| "<unidentified>".to_owned());
                PatientRecord::try_from(input).map_err(|source| CohortError::InvalidRecord {
                    index,
                    patient_id,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatientRecord> + '_ {
        self.records.iter()
    }

    /// Number of records with an observed readmission.
    #[must_use]
    pub fn positives(&self) -> usize {
        self.records.iter().filter(|r| r.outcome()).count()
    }

    /// Observed outcomes in input order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<bool> {
        self.records.iter().map(PatientRecord::outcome).collect()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PatientRecord> {
        self.records
    }
}

impl FromIterator<PatientRecord> for Cohort {
    fn from_iter<T: IntoIterator<Item = PatientRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Cohort {
    type Item = &'a PatientRecord;
    type IntoIter = std::slice::Iter<'a, PatientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
