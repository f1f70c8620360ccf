//! Flat row forms of an analysis report, for CSV and JSON export.
//!
//! Rows carry everything a formatter needs (file, page, dimensions,
//! fingerprint, set and group membership) so no consumer has to
//! re-derive the groupings from the records.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::analysis::{AnalysisOutcome, AnalysisReport, SkippedDocument};

/// One extracted photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRow {
    pub file: String,
    pub page: u32,
    pub width: u32,
    pub height: u32,
    pub fingerprint: String,
}

/// One record of one duplicate set; `set` is the 0-based index of the
/// set within the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateRow {
    pub set: usize,
    pub fingerprint: String,
    pub file: String,
    pub page: u32,
    pub width: u32,
    pub height: u32,
}

/// One member of one report group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub group: usize,
    pub file: String,
}

pub fn record_rows(report: &AnalysisReport) -> Vec<PhotoRow> {
    report
        .records
        .iter()
        .map(|record| PhotoRow {
            file: record.source.clone(),
            page: record.page_index,
            width: record.width,
            height: record.height,
            fingerprint: record.fingerprint.to_string(),
        })
        .collect()
}

pub fn duplicate_rows(report: &AnalysisReport) -> Vec<DuplicateRow> {
    report
        .duplicate_sets
        .iter()
        .enumerate()
        .flat_map(|(set, dup)| {
            dup.records.iter().map(move |record| DuplicateRow {
                set,
                fingerprint: dup.fingerprint.to_string(),
                file: record.source.clone(),
                page: record.page_index,
                width: record.width,
                height: record.height,
            })
        })
        .collect()
}

pub fn group_rows(report: &AnalysisReport) -> Vec<GroupRow> {
    report
        .report_groups
        .iter()
        .enumerate()
        .flat_map(|(group, members)| {
            members.members.iter().map(move |file| GroupRow {
                group,
                file: file.clone(),
            })
        })
        .collect()
}

/// Everything one run produced, in a single serializable document.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub generated_at: DateTime<Utc>,
    pub outcome: AnalysisOutcome,
    pub skipped: Vec<SkippedDocument>,
    pub photos: Vec<PhotoRow>,
    pub duplicates: Vec<DuplicateRow>,
    pub groups: Vec<GroupRow>,
}

impl ExportDocument {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            generated_at: Utc::now(),
            outcome: report.outcome(),
            skipped: report.skipped.clone(),
            photos: record_rows(report),
            duplicates: duplicate_rows(report),
            groups: group_rows(report),
        }
    }
}

/// Serialize rows as CSV with a header row.
pub fn write_csv<W: Write, S: Serialize>(rows: &[S], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
