use std::path::PathBuf;

use readmit_analysis::risk_factor::RiskFactorAnalyzer;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RiskFactorsArg {
    /// Cohort JSON file
    cohort: PathBuf,
    /// Scoring configuration JSON file whose indicators are tabulated
    /// (standard indicators if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RiskFactorsArg) -> anyhow::Result<()> {
    let RiskFactorsArg {
        cohort,
        config,
        output,
    } = arg;
    let config = util::read_scoring_config(config.as_deref())?;
    let scorer = util::build_scorer(&config)?;
    let cohort = util::read_cohort_file(cohort)?;
    let table = RiskFactorAnalyzer::for_scorer(&scorer).analyze(&cohort)?;

    eprintln!("Risk factors ({} records, {} readmitted):", table.cohort_size, table.positives);
    for factor in &table.factors {
        eprintln!(
            "  {:<26} n={:<6} prevalence={:>6.1}%  rate={}",
            factor.name,
            factor.count,
            factor.prevalence * 100.0,
            util::format_rate(factor.conditional_outcome_rate),
        );
    }
    Output::save_json(&table, output.clone())
}
