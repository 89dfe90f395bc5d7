//! Patient cohort data model for readmission risk analysis.
//!
//! Records arrive as [`PatientRecordInput`] values, where every field is
//! optional and unknown fields are rejected during deserialization. Converting
//! an input into a [`PatientRecord`] validates it once; after that the record
//! is immutable and every field is guaranteed present and in range.
//!
//! ```
//! use readmit_cohort::{Comorbidity, PatientRecord, PatientRecordInput, RecordError};
//!
//! let input: PatientRecordInput = serde_json::from_str(
//!     r#"{
//!         "patient_id": "P-001", "age": 81, "length_of_stay": 4.5,
//!         "prior_admissions": 1, "emergency_visits_12m": 0, "condition_count": 2,
//!         "diabetes": true, "hypertension": true, "heart_disease": false,
//!         "copd": false, "kidney_disease": false, "outcome": false
//!     }"#,
//! )
//! .unwrap();
//! let record = PatientRecord::try_from(input).unwrap();
//! assert!(record.has(Comorbidity::Diabetes));
//!
//! let incomplete = PatientRecordInput { patient_id: Some("P-002".into()), ..Default::default() };
//! assert_eq!(
//!     PatientRecord::try_from(incomplete),
//!     Err(RecordError::MissingField { field: "age" })
//! );
//! ```

pub use self::{cohort::*, record::*};

pub mod cohort;
pub mod record;

/// A single record failed validation.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("missing required field '{field}'")]
    MissingField { field: &'static str },
    #[display("invalid value {value} for field '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// A cohort could not be assembled from its inputs.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CohortError {
    #[display("record #{index} (patient '{patient_id}') is invalid: {source}")]
    InvalidRecord {
        index: usize,
        patient_id: String,
        source: RecordError,
    },
}
