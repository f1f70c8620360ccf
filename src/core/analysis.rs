use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::core::cluster::{cluster_reports, ReportGroup};
use crate::core::duplicate::{group_duplicates, DuplicateSet};
use crate::core::extract::extract_images;
use crate::core::hash::Fingerprint;
use crate::core::store::{duplicate_source_names, PhotoRecord, PhotoRecordStore};

/// One uploaded report: a display name, unique within the batch, plus
/// the raw PDF bytes.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no documents to analyze; add at least one PDF report")]
    EmptyBatch,

    #[error("duplicate document names in batch: {}", names.join(", "))]
    DuplicateSourceName { names: Vec<String> },

    #[error("analysis cancelled")]
    Cancelled,
}

/// Which success state a run landed in. Finding no photos at all
/// (nothing passed the size filter anywhere) is deliberately distinct
/// from finding photos with no repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisOutcome {
    NoPhotos,
    NoDuplicates { photo_count: usize },
    DuplicatesFound { photo_count: usize, set_count: usize },
}

/// A report that could not be parsed as a PDF. The rest of the batch is
/// unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub name: String,
    pub reason: String,
}

/// Everything one run produced. Duplicate sets and report groups are
/// derived from the records and carry enough structure (fingerprint,
/// per-record file and page, group membership) for formatters to render
/// tables or export files without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub records: Vec<PhotoRecord>,
    pub duplicate_sets: Vec<DuplicateSet>,
    pub report_groups: Vec<ReportGroup>,
    pub skipped: Vec<SkippedDocument>,
}

impl AnalysisReport {
    pub fn outcome(&self) -> AnalysisOutcome {
        if self.records.is_empty() {
            AnalysisOutcome::NoPhotos
        } else if self.duplicate_sets.is_empty() {
            AnalysisOutcome::NoDuplicates {
                photo_count: self.records.len(),
            }
        } else {
            AnalysisOutcome::DuplicatesFound {
                photo_count: self.records.len(),
                set_count: self.duplicate_sets.len(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisPhase {
    Validating,
    Extracting,
    Grouping,
    Clustering,
    Complete,
}

/// Advisory progress snapshot, one per phase transition and one per
/// document during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub documents_processed: usize,
    pub total_documents: usize,
    pub current_document: String,
    pub phase: AnalysisPhase,
}

pub type ProgressCallback = Box<dyn Fn(AnalysisProgress) + Send>;

/// Drives one analysis run over a batch of reports: validate names,
/// extract and filter photos document by document, fingerprint, group
/// by fingerprint, cluster reports. Owns the run's record store;
/// nothing is shared between runs.
pub struct Analyzer {
    config: AnalysisConfig,
    progress: Option<ProgressCallback>,
    cancelled: Arc<AtomicBool>,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Token for cancelling from another thread. Cancellation is
    /// honored between documents, before each document's extraction.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn run(&self, documents: &[SourceDocument]) -> Result<AnalysisReport, AnalysisError> {
        if documents.is_empty() {
            return Err(AnalysisError::EmptyBatch);
        }

        let total = documents.len();
        self.send_progress(0, total, "", AnalysisPhase::Validating);
        let collisions = duplicate_source_names(documents.iter().map(|d| d.name.as_str()));
        if !collisions.is_empty() {
            return Err(AnalysisError::DuplicateSourceName { names: collisions });
        }

        let mut store = PhotoRecordStore::new();
        let mut skipped = Vec::new();
        for (i, document) in documents.iter().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                return Err(AnalysisError::Cancelled);
            }
            self.send_progress(i, total, &document.name, AnalysisPhase::Extracting);

            let images = match extract_images(&document.bytes) {
                Ok(images) => images,
                Err(err) => {
                    // One broken report must not sink the rest of the batch.
                    log::warn!("skipping {}: {}", document.name, err);
                    skipped.push(SkippedDocument {
                        name: document.name.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for image in images {
                if !self.config.keeps(image.width, image.height) {
                    continue;
                }
                let fingerprint = Fingerprint::of(&image.bytes);
                store.push(PhotoRecord {
                    source: document.name.clone(),
                    page_index: image.page_index,
                    width: image.width,
                    height: image.height,
                    fingerprint,
                    bytes: image.bytes,
                });
            }
        }

        self.send_progress(total, total, "", AnalysisPhase::Grouping);
        let records = store.into_records();
        let duplicate_sets = group_duplicates(&records);

        self.send_progress(total, total, "", AnalysisPhase::Clustering);
        let report_groups = cluster_reports(&duplicate_sets);

        self.send_progress(total, total, "", AnalysisPhase::Complete);
        Ok(AnalysisReport {
            records,
            duplicate_sets,
            report_groups,
            skipped,
        })
    }

    fn send_progress(&self, processed: usize, total: usize, current: &str, phase: AnalysisPhase) {
        if let Some(callback) = &self.progress {
            callback(AnalysisProgress {
                documents_processed: processed,
                total_documents: total,
                current_document: current.to_string(),
                phase,
            });
        }
    }
}

/// One-shot convenience over [`Analyzer`] with no progress reporting.
pub fn run_analysis(
    documents: &[SourceDocument],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    Analyzer::new(config.clone()).run(documents)
}
