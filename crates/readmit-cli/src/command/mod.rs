use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use self::{evaluate::EvaluateArg, risk_factors::RiskFactorsArg, score::ScoreArg};

mod evaluate;
mod risk_factors;
mod score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Score every record of a cohort
    Score(#[clap(flatten)] ScoreArg),
    /// Evaluate calibration and discrimination of the score on a cohort
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Tabulate risk factor prevalence and outcome rates
    RiskFactors(#[clap(flatten)] RiskFactorsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::RiskFactors(arg) => risk_factors::run(&arg)?,
    }
    Ok(())
}

/// Logs to stderr. `RUST_LOG` applies unless `-v` is given.
fn init_logger(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}
