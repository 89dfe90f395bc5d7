use readmit_cohort::{Cohort, CohortError, PatientRecord, PatientRecordInput};
use readmit_scoring::{Contribution, RiskCategory, RiskScore, RiskScorer};
use serde::{Deserialize, Serialize};

/// Cohort input file: `{ "records": [ ... ] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CohortFile {
    pub records: Vec<PatientRecordInput>,
}

impl CohortFile {
    pub fn into_cohort(self) -> Result<Cohort, CohortError> {
        Cohort::from_inputs(self.records)
    }
}

/// One line of `readmit score` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecordEntry {
    pub patient_id: String,
    pub score: RiskScore,
    pub category: RiskCategory,
    pub contributions: Vec<Contribution>,
}

impl ScoredRecordEntry {
    pub fn new(scorer: &RiskScorer, record: &PatientRecord) -> Self {
        let score = scorer.score(record);
        Self {
            patient_id: record.patient_id().to_owned(),
            score,
            category: scorer.categorize(score),
            contributions: scorer.contributions(record),
        }
    }
}
