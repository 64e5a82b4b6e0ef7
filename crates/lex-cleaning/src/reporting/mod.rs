//! Report generation module.
//!
//! [`Comparator`] computes the before/after statistics of a run.
//! [`ReportGenerator`] turns a [`CleaningResult`](crate::CleaningResult)
//! into a [`CleaningReport`] suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_cleaning::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report("data/train.csv", Some("outputs/cleaned_dataset.csv"), &result);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"), None);
//! generator.write_report_to_file(&report, "train")?;
//! ```

mod comparator;
mod generator;

pub use comparator::Comparator;
pub use generator::{
    CleaningReport, DEFAULT_OUTPUT_NAME, ReportGenerator, ReportSummary, ValidationSummary,
};
