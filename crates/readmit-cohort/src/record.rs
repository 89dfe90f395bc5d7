use serde::{Deserialize, Serialize};

use crate::RecordError;

/// Numeric attributes of a patient encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    /// Age in years.
    #[display("age")]
    Age,
    /// Length of the index stay in days.
    #[display("length_of_stay")]
    LengthOfStay,
    /// Inpatient admissions in the previous 12 months.
    #[display("prior_admissions")]
    PriorAdmissions,
    /// Emergency department visits in the previous 12 months.
    #[display("emergency_visits_12m")]
    EmergencyVisits12m,
    /// Number of active chronic conditions.
    #[display("condition_count")]
    ConditionCount,
}

impl NumericField {
    pub const ALL: [Self; 5] = [
        Self::Age,
        Self::LengthOfStay,
        Self::PriorAdmissions,
        Self::EmergencyVisits12m,
        Self::ConditionCount,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::LengthOfStay => "length_of_stay",
            Self::PriorAdmissions => "prior_admissions",
            Self::EmergencyVisits12m => "emergency_visits_12m",
            Self::ConditionCount => "condition_count",
        }
    }

    /// Whether the field holds a whole-number count.
    #[must_use]
    pub const fn is_count(self) -> bool {
        matches!(
            self,
            Self::PriorAdmissions | Self::EmergencyVisits12m | Self::ConditionCount
        )
    }
}

/// Comorbidity flags recorded for each encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Comorbidity {
    #[display("diabetes")]
    Diabetes,
    #[display("hypertension")]
    Hypertension,
    #[display("heart_disease")]
    HeartDisease,
    #[display("copd")]
    Copd,
    #[display("kidney_disease")]
    KidneyDisease,
}

impl Comorbidity {
    pub const ALL: [Self; 5] = [
        Self::Diabetes,
        Self::Hypertension,
        Self::HeartDisease,
        Self::Copd,
        Self::KidneyDisease,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Hypertension => "hypertension",
            Self::HeartDisease => "heart_disease",
            Self::Copd => "copd",
            Self::KidneyDisease => "kidney_disease",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Hypertension => "Hypertension",
            Self::HeartDisease => "Heart disease",
            Self::Copd => "COPD",
            Self::KidneyDisease => "Kidney disease",
        }
    }
}

/// Unvalidated patient record as supplied by the input provider.
///
/// Every field is optional so that absence can be reported precisely by
/// [`PatientRecord::try_from`]. Unknown fields are a deserialization error.
/// Numeric fields are read as `f64` so that negative or fractional counts are
/// reported as invalid values rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientRecordInput {
    pub patient_id: Option<String>,
    pub age: Option<f64>,
    pub length_of_stay: Option<f64>,
    pub prior_admissions: Option<f64>,
    pub emergency_visits_12m: Option<f64>,
    pub condition_count: Option<f64>,
    pub diabetes: Option<bool>,
    pub hypertension: Option<bool>,
    pub heart_disease: Option<bool>,
    pub copd: Option<bool>,
    pub kidney_disease: Option<bool>,
    /// Readmitted within 30 days of discharge.
    pub outcome: Option<bool>,
}

impl PatientRecordInput {
    fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Age => self.age,
            NumericField::LengthOfStay => self.length_of_stay,
            NumericField::PriorAdmissions => self.prior_admissions,
            NumericField::EmergencyVisits12m => self.emergency_visits_12m,
            NumericField::ConditionCount => self.condition_count,
        }
    }

    fn comorbidity(&self, flag: Comorbidity) -> Option<bool> {
        match flag {
            Comorbidity::Diabetes => self.diabetes,
            Comorbidity::Hypertension => self.hypertension,
            Comorbidity::HeartDisease => self.heart_disease,
            Comorbidity::Copd => self.copd,
            Comorbidity::KidneyDisease => self.kidney_disease,
        }
    }
}

/// A validated patient encounter.
///
/// Constructed only through [`PatientRecord::try_from`] (or the
/// [`PatientRecordBuilder`], which goes through the same validation), so
/// every field is present, finite, and non-negative, and count fields are
/// whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatientRecordInput", into = "PatientRecordInput")]
pub struct PatientRecord {
    patient_id: String,
    age: f64,
    length_of_stay: f64,
    prior_admissions: u32,
    emergency_visits_12m: u32,
    condition_count: u32,
    comorbidities: [bool; 5],
    outcome: bool,
}

impl PatientRecord {
    /// Starts a builder for a record with zeroed numerics, no comorbidities,
    /// and a negative outcome.
    ///
    /// ```
    /// use readmit_cohort::{Comorbidity, NumericField, PatientRecord};
    ///
    /// let record = PatientRecord::builder("P-7")
    ///     .age(80.0)
    ///     .condition_count(3)
    ///     .comorbidity(Comorbidity::Copd, true)
    ///     .outcome(true)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(record.numeric(NumericField::ConditionCount), 3.0);
    /// assert!(record.outcome());
    /// ```
    #[must_use]
    pub fn builder(patient_id: impl Into<String>) -> PatientRecordBuilder {
        PatientRecordBuilder::new(patient_id)
    }

    #[must_use]
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    #[must_use]
    pub fn age(&self) -> f64 {
        self.age
    }

    #[must_use]
    pub fn length_of_stay(&self) -> f64 {
        self.length_of_stay
    }

    #[must_use]
    pub fn prior_admissions(&self) -> u32 {
        self.prior_admissions
    }

    #[must_use]
    pub fn emergency_visits_12m(&self) -> u32 {
        self.emergency_visits_12m
    }

    #[must_use]
    pub fn condition_count(&self) -> u32 {
        self.condition_count
    }

    /// Observed 30-day readmission.
    #[must_use]
    pub fn outcome(&self) -> bool {
        self.outcome
    }

    /// Returns a numeric attribute as `f64`.
    #[must_use]
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Age => self.age,
            NumericField::LengthOfStay => self.length_of_stay,
            NumericField::PriorAdmissions => f64::from(self.prior_admissions),
            NumericField::EmergencyVisits12m => f64::from(self.emergency_visits_12m),
            NumericField::ConditionCount => f64::from(self.condition_count),
        }
    }

    /// Returns whether the comorbidity flag is set.
    #[must_use]
    pub fn has(&self, flag: Comorbidity) -> bool {
        self.comorbidities[flag as usize]
    }
}

impl TryFrom<PatientRecordInput> for PatientRecord {
    type Error = RecordError;

    fn try_from(input: PatientRecordInput) -> Result<Self, Self::Error> {
        let patient_id = input
            .patient_id
            .clone()
            .ok_or(RecordError::MissingField {
                field: "patient_id",
            })?;
        if patient_id.trim().is_empty() {
            return Err(RecordError::InvalidValue {
                field: "patient_id",
                value: format!("{patient_id:?}"),
                reason: "must not be empty",
            });
        }

        let age = real_field(&input, NumericField::Age)?;
        let length_of_stay = real_field(&input, NumericField::LengthOfStay)?;
        let prior_admissions = count_field(&input, NumericField::PriorAdmissions)?;
        let emergency_visits_12m = count_field(&input, NumericField::EmergencyVisits12m)?;
        let condition_count = count_field(&input, NumericField::ConditionCount)?;

        let mut comorbidities = [false; 5];
        for flag in Comorbidity::ALL {
            comorbidities[flag as usize] =
                input
                    .comorbidity(flag)
                    .ok_or(RecordError::MissingField {
                        field: flag.as_str(),
                    })?;
        }

        let outcome = input
            .outcome
            .ok_or(RecordError::MissingField { field: "outcome" })?;

        Ok(Self {
            patient_id,
            age,
            length_of_stay,
            prior_admissions,
            emergency_visits_12m,
            condition_count,
            comorbidities,
            outcome,
        })
    }
}

impl From<PatientRecord> for PatientRecordInput {
    fn from(record: PatientRecord) -> Self {
        Self {
            age: Some(record.age),
            length_of_stay: Some(record.length_of_stay),
            prior_admissions: Some(f64::from(record.prior_admissions)),
            emergency_visits_12m: Some(f64::from(record.emergency_visits_12m)),
            condition_count: Some(f64::from(record.condition_count)),
            diabetes: Some(record.has(Comorbidity::Diabetes)),
            hypertension: Some(record.has(Comorbidity::Hypertension)),
            heart_disease: Some(record.has(Comorbidity::HeartDisease)),
            copd: Some(record.has(Comorbidity::Copd)),
            kidney_disease: Some(record.has(Comorbidity::KidneyDisease)),
            outcome: Some(record.outcome),
            patient_id: Some(record.patient_id),
        }
    }
}

fn real_field(input: &PatientRecordInput, field: NumericField) -> Result<f64, RecordError> {
    let value = input.numeric(field).ok_or(RecordError::MissingField {
        field: field.as_str(),
    })?;
    let invalid = |reason| RecordError::InvalidValue {
        field: field.as_str(),
        value: value.to_string(),
        reason,
    };
    if !value.is_finite() {
        return Err(invalid("must be finite"));
    }
    if value < 0.0 {
        return Err(invalid("must not be negative"));
    }
    Ok(value)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_field(input: &PatientRecordInput, field: NumericField) -> Result<u32, RecordError> {
    debug_assert!(field.is_count());
    let value = real_field(input, field)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(RecordError::InvalidValue {
            field: field.as_str(),
            value: value.to_string(),
            reason: "must be a whole-number count",
        });
    }
    Ok(value as u32)
}

/// Builder for [`PatientRecord`], validated on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct PatientRecordBuilder {
    input: PatientRecordInput,
}

impl PatientRecordBuilder {
    fn new(patient_id: impl Into<String>) -> Self {
        Self {
            input: PatientRecordInput {
                patient_id: Some(patient_id.into()),
                age: Some(0.0),
                length_of_stay: Some(0.0),
                prior_admissions: Some(0.0),
                emergency_visits_12m: Some(0.0),
                condition_count: Some(0.0),
                diabetes: Some(false),
                hypertension: Some(false),
                heart_disease: Some(false),
                copd: Some(false),
                kidney_disease: Some(false),
                outcome: Some(false),
            },
        }
    }

    #[must_use]
    pub fn age(mut self, age: f64) -> Self {
        self.input.age = Some(age);
        self
    }

    #[must_use]
    pub fn length_of_stay(mut self, days: f64) -> Self {
        self.input.length_of_stay = Some(days);
        self
    }

    #[must_use]
    pub fn prior_admissions(mut self, count: u32) -> Self {
        self.input.prior_admissions = Some(f64::from(count));
        self
    }

    #[must_use]
    pub fn emergency_visits_12m(mut self, count: u32) -> Self {
        self.input.emergency_visits_12m = Some(f64::from(count));
        self
    }

    #[must_use]
    pub fn condition_count(mut self, count: u32) -> Self {
        self.input.condition_count = Some(f64::from(count));
        self
    }

    #[must_use]
    pub fn comorbidity(mut self, flag: Comorbidity, present: bool) -> Self {
        let slot = match flag {
            Comorbidity::Diabetes => &mut self.input.diabetes,
            Comorbidity::Hypertension => &mut self.input.hypertension,
            Comorbidity::HeartDisease => &mut self.input.heart_disease,
            Comorbidity::Copd => &mut self.input.copd,
            Comorbidity::KidneyDisease => &mut self.input.kidney_disease,
        };
        *slot = Some(present);
        self
    }

    #[must_use]
    pub fn outcome(mut self, readmitted: bool) -> Self {
        self.input.outcome = Some(readmitted);
        self
    }

    pub fn build(self) -> Result<PatientRecord, RecordError> {
        PatientRecord::try_from(self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> PatientRecordInput {
        PatientRecord::builder("P-1")
            .age(70.0)
            .length_of_stay(3.0)
            .prior_admissions(1)
            .emergency_visits_12m(2)
            .condition_count(1)
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let fields: [(&'static str, fn(&mut PatientRecordInput)); 12] = [
            ("patient_id", |i| i.patient_id = None),
            ("age", |i| i.age = None),
            ("length_of_stay", |i| i.length_of_stay = None),
            ("prior_admissions", |i| i.prior_admissions = None),
            ("emergency_visits_12m", |i| i.emergency_visits_12m = None),
            ("condition_count", |i| i.condition_count = None),
            ("diabetes", |i| i.diabetes = None),
            ("hypertension", |i| i.hypertension = None),
            ("heart_disease", |i| i.heart_disease = None),
            ("copd", |i| i.copd = None),
            ("kidney_disease", |i| i.kidney_disease = None),
            ("outcome", |i| i.outcome = None),
        ];
        for (field, clear) in fields {
            let mut input = complete_input();
            clear(&mut input);
            assert_eq!(
                PatientRecord::try_from(input),
                Err(RecordError::MissingField { field }),
            );
        }
    }

    #[test]
    fn test_negative_age_rejected() {
        let mut input = complete_input();
        input.age = Some(-1.0);
        let err = PatientRecord::try_from(input).unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidValue { field: "age", .. }
        ));
    }

    #[test]
    fn test_fractional_count_rejected() {
        let mut input = complete_input();
        input.prior_admissions = Some(1.5);
        let err = PatientRecord::try_from(input).unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidValue {
                field: "prior_admissions",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut input = complete_input();
        input.length_of_stay = Some(f64::NAN);
        assert!(PatientRecord::try_from(input).is_err());
    }

    #[test]
    fn test_blank_patient_id_rejected() {
        let mut input = complete_input();
        input.patient_id = Some("  ".into());
        assert!(matches!(
            PatientRecord::try_from(input),
            Err(RecordError::InvalidValue {
                field: "patient_id",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_field_rejected_by_serde() {
        let json = r#"{"patient_id": "P-1", "blood_type": "A"}"#;
        assert!(serde_json::from_str::<PatientRecordInput>(json).is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_record() {
        let record = PatientRecord::builder("P-9")
            .age(88.5)
            .length_of_stay(9.0)
            .condition_count(4)
            .comorbidity(Comorbidity::HeartDisease, true)
            .outcome(true)
            .build()
            .unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: PatientRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"patient_id": "P-1", "age": 50}"#;
        let err = serde_json::from_str::<PatientRecord>(json).unwrap_err();
        assert!(err.to_string().contains("length_of_stay"));
    }

    #[test]
    fn test_numeric_accessor() {
        let record = PatientRecord::try_from(complete_input()).unwrap();
        assert_eq!(record.numeric(NumericField::Age), 70.0);
        assert_eq!(record.numeric(NumericField::EmergencyVisits12m), 2.0);
        assert!(NumericField::ALL.iter().all(|f| record.numeric(*f) >= 0.0));
    }
}
