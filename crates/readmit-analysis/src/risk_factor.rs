//! Risk factor prevalence and conditional outcome rates
//!
//! For every indicator the analyser counts the records in which it is present
//! and the readmission rate among them. An indicator that never occurs has
//! prevalence `0.0` and an undefined (`None`) conditional rate, which is kept
//! distinct from a defined rate of `0.0`.

use readmit_cohort::PatientRecord;
use readmit_scoring::{
    BoxedRiskIndicator, RiskIndicator, RiskScorer, comorbidity_indicators, standard_indicators,
};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// The five scoring indicators followed by the five comorbidity flags.
#[must_use]
pub fn standard_risk_factors() -> Vec<BoxedRiskIndicator> {
    risk_factors_for(&standard_indicators())
}

/// `indicators` followed by every comorbidity flag whose id they do not
/// already use.
#[must_use]
pub fn risk_factors_for(indicators: &[BoxedRiskIndicator]) -> Vec<BoxedRiskIndicator> {
    let mut factors = indicators.to_vec();
    for comorbidity in comorbidity_indicators() {
        if factors.iter().all(|f| f.id() != comorbidity.id()) {
            factors.push(comorbidity);
        }
    }
    factors
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub id: String,
    pub name: String,
    /// Records in which the indicator is present.
    pub count: usize,
    /// `count / cohort size`.
    pub prevalence: f64,
    /// Outcome rate among records with the indicator.
    pub conditional_outcome_rate: Option<f64>,
    /// Outcome rate among records without the indicator.
    pub absent_outcome_rate: Option<f64>,
    /// `conditional_outcome_rate / absent_outcome_rate`.
    pub relative_risk: Option<f64>,
}

/// Risk factors in the order of the analysed indicator list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorTable {
    pub cohort_size: usize,
    pub positives: usize,
    pub factors: Vec<RiskFactor>,
}

impl RiskFactorTable {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct RiskFactorAnalyzer {
    indicators: Vec<BoxedRiskIndicator>,
}

impl Default for RiskFactorAnalyzer {
    fn default() -> Self {
        Self::new(standard_risk_factors())
    }
}

impl RiskFactorAnalyzer {
    #[must_use]
    pub fn new(indicators: Vec<BoxedRiskIndicator>) -> Self {
        Self { indicators }
    }

    /// Analyses the scorer's own indicators plus the comorbidity flags.
    #[must_use]
    pub fn for_scorer(scorer: &RiskScorer) -> Self {
        Self::new(risk_factors_for(scorer.indicators()))
    }

    #[must_use]
    pub fn indicators(&self) -> &[BoxedRiskIndicator] {
        &self.indicators
    }

    /// Tabulates every indicator over `records`.
    ///
    /// ```
    /// use readmit_analysis::risk_factor::RiskFactorAnalyzer;
    /// use readmit_cohort::{Cohort, PatientRecord};
    ///
    /// let cohort = [
    ///     PatientRecord::builder("a").age(80.0).outcome(true).build().unwrap(),
    ///     PatientRecord::builder("b").age(80.0).build().unwrap(),
    ///     PatientRecord::builder("c").build().unwrap(),
    /// ]
    /// .into_iter()
    /// .collect::<Cohort>();
    ///
    /// let table = RiskFactorAnalyzer::default().analyze(&cohort).unwrap();
    /// let age = table.get("advanced_age").unwrap();
    /// assert_eq!(age.count, 2);
    /// assert_eq!(age.conditional_outcome_rate, Some(0.5));
    /// assert_eq!(table.get("copd").unwrap().conditional_outcome_rate, None);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn analyze<'a, I>(&self, records: I) -> Result<RiskFactorTable, AnalysisError>
    where
        I: IntoIterator<Item = &'a PatientRecord>,
    {
        let records = records.into_iter().collect::<Vec<_>>();
        if records.is_empty() {
            return Err(AnalysisError::EmptyCohort);
        }
        let cohort_size = records.len();
        let positives = records.iter().filter(|r| r.outcome()).count();

        let rate = |outcomes: usize, count: usize| {
            (count > 0).then(|| outcomes as f64 / count as f64)
        };
        let factors = self
            .indicators
            .iter()
            .map(|indicator| {
                let (mut count, mut present_positives) = (0, 0);
                for record in &records {
                    if indicator.is_present(record) {
                        count += 1;
                        if record.outcome() {
                            present_positives += 1;
                        }
                    }
                }
                let conditional_outcome_rate = rate(present_positives, count);
                let absent_outcome_rate =
                    rate(positives - present_positives, cohort_size - count);
                let relative_risk = conditional_outcome_rate
                    .zip(absent_outcome_rate)
                    .filter(|&(_, absent)| absent > 0.0)
                    .map(|(present, absent)| present / absent);
                RiskFactor {
                    id: indicator.id().to_owned(),
                    name: indicator.name().to_owned(),
                    count,
                    prevalence: count as f64 / cohort_size as f64,
                    conditional_outcome_rate,
                    absent_outcome_rate,
                    relative_risk,
                }
            })
            .collect::<Vec<_>>();
        log::debug!(
            "analysed {} risk factors over {cohort_size} records",
            factors.len()
        );
        Ok(RiskFactorTable {
            cohort_size,
            positives,
            factors,
        })
    }
}

#[cfg(test)]
mod tests {
    use readmit_cohort::{Cohort, Comorbidity, NumericField};
    use readmit_scoring::{Comparison, ComorbidityIndicator, ThresholdIndicator};

    use super::*;

    fn cohort() -> Cohort {
        [
            PatientRecord::builder("a")
                .age(80.0)
                .comorbidity(Comorbidity::Diabetes, true)
                .outcome(true)
                .build()
                .unwrap(),
            PatientRecord::builder("b")
                .age(80.0)
                .comorbidity(Comorbidity::Diabetes, true)
                .build()
                .unwrap(),
            PatientRecord::builder("c")
                .prior_admissions(3)
                .build()
                .unwrap(),
            PatientRecord::builder("d")
                .comorbidity(Comorbidity::Diabetes, true)
                .outcome(true)
                .build()
                .unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_standard_factor_order() {
        let ids = standard_risk_factors()
            .iter()
            .map(|f| f.id().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                "advanced_age",
                "multi_morbidity",
                "frequent_admissions",
                "frequent_ed_use",
                "extended_stay",
                "diabetes",
                "hypertension",
                "heart_disease",
                "copd",
                "kidney_disease",
            ]
        );
    }

    #[test]
    fn test_table_keeps_indicator_order() {
        let table = RiskFactorAnalyzer::default().analyze(&cohort()).unwrap();
        assert_eq!(table.factors.len(), 10);
        assert_eq!(table.factors[0].id, "advanced_age");
        assert_eq!(table.factors[9].id, "kidney_disease");
        assert_eq!((table.cohort_size, table.positives), (4, 2));
    }

    #[test]
    fn test_rates_and_relative_risk() {
        let table = RiskFactorAnalyzer::default().analyze(&cohort()).unwrap();

        let diabetes = table.get("diabetes").unwrap();
        assert_eq!(diabetes.count, 3);
        assert_eq!(diabetes.prevalence, 0.75);
        assert!((diabetes.conditional_outcome_rate.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(diabetes.absent_outcome_rate, Some(0.0));
        assert_eq!(diabetes.relative_risk, None);

        let age = table.get("advanced_age").unwrap();
        assert_eq!(age.conditional_outcome_rate, Some(0.5));
        assert_eq!(age.absent_outcome_rate, Some(0.5));
        assert_eq!(age.relative_risk, Some(1.0));

        let admissions = table.get("frequent_admissions").unwrap();
        assert_eq!(admissions.conditional_outcome_rate, Some(0.0));
    }

    #[test]
    fn test_absent_indicator_is_undefined_not_zero() {
        let table = RiskFactorAnalyzer::default().analyze(&cohort()).unwrap();
        let copd = table.get("copd").unwrap();
        assert_eq!(copd.count, 0);
        assert_eq!(copd.prevalence, 0.0);
        assert_eq!(copd.conditional_outcome_rate, None);
        assert_eq!(copd.relative_risk, None);
        assert_eq!(copd.absent_outcome_rate, Some(0.5));
    }

    #[test]
    fn test_empty_cohort() {
        assert_eq!(
            RiskFactorAnalyzer::default().analyze(&Cohort::default()),
            Err(AnalysisError::EmptyCohort)
        );
    }

    #[test]
    fn test_scorer_indicators_come_first() {
        let scorer = RiskScorer::new(vec![
            Box::new(ThresholdIndicator::new(
                "elderly",
                "Elderly",
                NumericField::Age,
                Comparison::AtLeast,
                65.0,
                10,
            )),
            Box::new(ComorbidityIndicator::new(Comorbidity::Diabetes, 20)),
        ]);
        let analyzer = RiskFactorAnalyzer::for_scorer(&scorer);
        let ids = analyzer
            .indicators()
            .iter()
            .map(|f| f.id().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                "elderly",
                "diabetes",
                "hypertension",
                "heart_disease",
                "copd",
                "kidney_disease",
            ]
        );

        let table = analyzer.analyze(&cohort()).unwrap();
        assert_eq!(table.get("elderly").unwrap().count, 2);
        assert_eq!(table.get("diabetes").unwrap().count, 3);
        assert_eq!(table.get("advanced_age"), None);
    }

    #[test]
    fn test_standard_scorer_matches_standard_factors() {
        let analyzer = RiskFactorAnalyzer::for_scorer(&RiskScorer::standard());
        assert_eq!(analyzer.indicators().len(), standard_risk_factors().len());
    }

    #[test]
    fn test_custom_indicator_list() {
        let analyzer = RiskFactorAnalyzer::new(comorbidity_indicators());
        let table = analyzer.analyze(&cohort()).unwrap();
        assert_eq!(table.factors.len(), 5);
        assert_eq!(table.factors[0].name, "Diabetes");
    }
}
