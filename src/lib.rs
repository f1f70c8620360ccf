//! Detect byte-identical photos shared across PDF inspection reports.
//!
//! The pipeline takes a batch of `(name, bytes)` documents, extracts
//! every embedded raster image above a configurable size threshold,
//! fingerprints each image's raw encoded bytes, groups identical
//! fingerprints into duplicate sets, and clusters the reports into
//! connected components linked by shared duplicates.
//!
//! ```no_run
//! use photodup::{run_analysis, AnalysisConfig, SourceDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = vec![
//!     SourceDocument::new("site-a.pdf", std::fs::read("site-a.pdf")?),
//!     SourceDocument::new("site-b.pdf", std::fs::read("site-b.pdf")?),
//! ];
//! let report = run_analysis(&documents, &AnalysisConfig::default())?;
//! for set in &report.duplicate_sets {
//!     println!("{} appears {} times", set.fingerprint, set.records.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Matching is strictly binary-exact: a re-encoded or resized copy of
//! the same photograph will not be detected.

pub mod config;
pub mod core;
pub mod export;

pub use config::AnalysisConfig;
pub use core::analysis::{
    run_analysis, AnalysisError, AnalysisOutcome, AnalysisReport, Analyzer, SkippedDocument,
    SourceDocument,
};
pub use core::cluster::ReportGroup;
pub use core::duplicate::DuplicateSet;
pub use core::extract::{extract_images, ExtractError, ExtractedImage};
pub use core::hash::Fingerprint;
pub use core::store::{PhotoRecord, PhotoRecordStore};
