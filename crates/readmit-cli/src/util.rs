use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use readmit_cohort::Cohort;
use readmit_scoring::{RiskScorer, ScoringConfig};

use crate::schema::cohort::CohortFile;

/// Destination of a command's JSON result.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>, PathBuf),
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout when `path` is
    /// `None`.
    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match path {
            Some(path) => {
                let file = File::create(&path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Output::File(BufWriter::new(file), path)
            }
            None => Output::Stdout(io::stdout().lock()),
        };
        output
            .write_json(value)
            .with_context(|| format!("Failed to write JSON to {}", output.target()))?;
        log::info!("wrote JSON to {}", output.target());
        Ok(())
    }

    fn target(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File(_, path) => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> io::Result<()>
    where
        T: serde::Serialize,
    {
        let writer: &mut dyn Write = match self {
            Output::Stdout(writer) => writer,
            Output::File(writer, _) => writer,
        };
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}

fn read_json_file<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file =
        File::open(path).with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {kind} JSON file: {}", path.display()))
}

/// Reads and validates a cohort file.
///
/// Any invalid record fails the whole file.
pub fn read_cohort_file<P>(path: P) -> anyhow::Result<Cohort>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file: CohortFile = read_json_file("cohort", path)?;
    let cohort = file
        .into_cohort()
        .with_context(|| format!("Invalid cohort file: {}", path.display()))?;
    log::info!("loaded {} records from {}", cohort.len(), path.display());
    Ok(cohort)
}

/// Reads a scoring configuration, or the standard one when `path` is `None`.
pub fn read_scoring_config(path: Option<&Path>) -> anyhow::Result<ScoringConfig> {
    match path {
        Some(path) => read_json_file("scoring config", path),
        None => Ok(ScoringConfig::default()),
    }
}

pub fn build_scorer(config: &ScoringConfig) -> anyhow::Result<RiskScorer> {
    config
        .build_scorer()
        .context("Invalid scoring configuration")
}

/// Reads a reference curve: a JSON array of predicted rates, one per decile.
pub fn read_reference_file<P>(path: P) -> anyhow::Result<Vec<f64>>
where
    P: AsRef<Path>,
{
    read_json_file("reference curve", path.as_ref())
}

/// Formats a rate as a percentage, or `n/a` when undefined.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate * 100.0),
        None => "n/a".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_cohort_file() {
        let file = write_temp(
            r#"{ "records": [
                { "patient_id": "A", "age": 80, "length_of_stay": 3, "prior_admissions": 0,
                  "emergency_visits_12m": 0, "condition_count": 1, "diabetes": false,
                  "hypertension": true, "heart_disease": false, "copd": false,
                  "kidney_disease": false, "outcome": true }
            ] }"#,
        );
        let cohort = read_cohort_file(file.path()).unwrap();
        assert_eq!(cohort.len(), 1);
        assert_eq!(cohort.positives(), 1);
    }

    #[test]
    fn test_invalid_record_fails_whole_file() {
        let file = write_temp(
            r#"{ "records": [
                { "patient_id": "A", "age": 80, "length_of_stay": 3, "prior_admissions": 1.5,
                  "emergency_visits_12m": 0, "condition_count": 1, "diabetes": false,
                  "hypertension": true, "heart_disease": false, "copd": false,
                  "kidney_disease": false, "outcome": true }
            ] }"#,
        );
        let err = read_cohort_file(file.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid cohort file"), "{message}");
        assert!(message.contains("prior_admissions"), "{message}");
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let file = write_temp(r#"{ "records": [ { "patient_id": "A", "weight_kg": 70 } ] }"#);
        let err = read_cohort_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse cohort JSON file"));
    }

    #[test]
    fn test_default_scoring_config() {
        let config = read_scoring_config(None).unwrap();
        assert_eq!(build_scorer(&config).unwrap().max_score(), 90);
    }

    #[test]
    fn test_read_reference_file() {
        let file = write_temp("[0.1, 0.2, 0.3]");
        assert_eq!(read_reference_file(file.path()).unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.125)), "12.5%");
        assert_eq!(format_rate(Some(0.0)), "0.0%");
        assert_eq!(format_rate(None), "n/a");
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        Output::save_json(&vec![1, 2, 3], Some(path.clone())).unwrap();
        let written: Vec<u32> = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, [1, 2, 3]);
    }
}
