use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use readmit_analysis::{
    calibration::{self, CalibrationEvaluator, ReferenceCurve},
    discrimination::{self, DiscriminationEvaluator, ThresholdOutcome},
    overview::CohortOverview,
    risk_factor::RiskFactorAnalyzer,
    summary::StratifiedSummary,
};

use crate::{
    schema::report::{EvaluationReport, Section},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Cohort JSON file
    cohort: PathBuf,
    /// Scoring configuration JSON file (standard indicators if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Score thresholds for the precision/recall sweep
    #[arg(long, value_delimiter = ',', default_value = "25,50,75")]
    thresholds: Vec<f64>,
    /// JSON array of predicted readmission rates, one per decile
    /// (normalized mean score if omitted)
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        cohort: cohort_path,
        config,
        thresholds,
        reference,
        output,
    } = arg;

    let config = util::read_scoring_config(config.as_deref())?;
    let scorer = util::build_scorer(&config)?;
    let cohort = util::read_cohort_file(cohort_path)?;
    let reference = match reference {
        Some(path) => ReferenceCurve::Explicit(util::read_reference_file(path)?),
        None => ReferenceCurve::NormalizedScore,
    };

    let scored = scorer.score_cohort(cohort);
    let overview = CohortOverview::from_cohort(&scored).context("Cannot evaluate cohort")?;

    let mut deciles = StratifiedSummary::by_decile(&scored).context("Cannot evaluate cohort")?;
    reference
        .apply(&mut deciles, scored.max_score())
        .context("Reference curve does not match the decile layout")?;
    let calibration = CalibrationEvaluator::default()
        .evaluate(&calibration::buckets_from_summary(&deciles))
        .into();

    let scores = discrimination::score_values(&scored);
    let outcomes = scored.outcomes();
    let auc = DiscriminationEvaluator::auc(&scores, &outcomes).into();
    let threshold_sweep =
        DiscriminationEvaluator::threshold_metrics(&scores, &outcomes, thresholds).into();

    let risk_factors = RiskFactorAnalyzer::for_scorer(&scorer)
        .analyze(scored.iter().map(|r| &r.record))
        .context("Cannot evaluate cohort")?;

    let report = EvaluationReport {
        generated_at: Utc::now(),
        cohort_file: cohort_path.display().to_string(),
        scoring: config,
        overview,
        deciles,
        calibration,
        auc,
        threshold_sweep,
        risk_factors,
    };
    print_summary(&report);
    Output::save_json(&report, output.clone())
}

fn print_summary(report: &EvaluationReport) {
    let overview = &report.overview;
    eprintln!(
        "Cohort: {} records, {} readmitted ({})",
        overview.count,
        overview.positives,
        util::format_rate(Some(overview.observed_rate))
    );
    eprintln!(
        "Score: mean {:.1}, median {:.1}, range {}-{} (max {})",
        overview.score_stats.mean,
        overview.score_stats.median,
        overview.score_stats.min,
        overview.score_stats.max,
        overview.max_score
    );

    eprintln!("Categories:");
    for bucket in &overview.categories.buckets {
        eprintln!(
            "  {:<9} n={:<6} observed={}",
            bucket.bucket.to_string(),
            bucket.count,
            util::format_rate(bucket.observed_rate)
        );
    }

    print_section("AUC", &report.auc, |auc| eprintln!("AUC: {auc:.3}"));
    print_section("Calibration", &report.calibration, |value| {
        eprintln!(
            "Calibration: MAE {:.3}, RMSE {:.3}, chi-square {:.2} (df {}, p {:.3})",
            value.mae,
            value.rmse,
            value.chi_square.statistic,
            value.chi_square.degrees_of_freedom,
            value.chi_square.p_value
        );
    });
    print_section("Threshold sweep", &report.threshold_sweep, |sweep| {
        eprintln!("Threshold sweep:");
        print_sweep(sweep);
    });
}

fn print_section<T>(label: &str, section: &Section<T>, print: impl FnOnce(&T)) {
    match section.value() {
        Some(value) => print(value),
        None => eprintln!(
            "{label}: unavailable ({})",
            section.reason().unwrap_or_default()
        ),
    }
}

fn print_sweep(sweep: &[ThresholdOutcome]) {
    for outcome in sweep {
        match outcome.metrics() {
            Some(m) => eprintln!(
                "  score >= {:<5} precision={:.3} recall={:.3} F1={:.3}",
                m.threshold, m.precision, m.recall, m.f1
            ),
            None => eprintln!("  score >= {:<5} no records flagged", outcome.threshold()),
        }
    }
}
