pub mod cohort;
pub mod report;
