use std::path::PathBuf;

use crate::{
    schema::cohort::ScoredRecordEntry,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Cohort JSON file
    cohort: PathBuf,
    /// Scoring configuration JSON file (standard indicators if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg {
        cohort,
        config,
        output,
    } = arg;
    let config = util::read_scoring_config(config.as_deref())?;
    let scorer = util::build_scorer(&config)?;
    let cohort = util::read_cohort_file(cohort)?;

    let entries = cohort
        .iter()
        .map(|record| ScoredRecordEntry::new(&scorer, record))
        .collect::<Vec<_>>();
    log::info!(
        "scored {} records (max score {})",
        entries.len(),
        scorer.max_score()
    );
    Output::save_json(&entries, output.clone())
}
