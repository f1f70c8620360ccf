use std::collections::HashSet;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::core::hash::Fingerprint;

/// One extracted inspection photo, tied to the report and page it came
/// from. Immutable once created. Identical fingerprints across records
/// are the signal the pipeline exists to detect, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Name of the report the photo came from.
    pub source: String,
    /// 0-based page within that report.
    pub page_index: u32,
    pub width: u32,
    pub height: u32,
    pub fingerprint: Fingerprint,
    /// Raw encoded payload, kept only for display and export.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl PhotoRecord {
    /// Decode the payload into pixels for display or export.
    pub fn decode_payload(&self) -> image::ImageResult<DynamicImage> {
        image::load_from_memory(&self.bytes)
    }
}

/// Append-only accumulation of photo records across one batch of
/// reports. Owned by a single run, never shared between runs.
#[derive(Debug, Default)]
pub struct PhotoRecordStore {
    records: Vec<PhotoRecord>,
}

impl PhotoRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PhotoRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<PhotoRecord> {
        self.records
    }
}

/// Names that appear more than once in a batch, in first-seen order.
/// A non-empty result means the same physical report may have been
/// submitted twice, which would double edges in the relationship graph,
/// so the batch must be rejected before any extraction happens.
pub fn duplicate_source_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut flagged = HashSet::new();
    let mut collisions = Vec::new();
    for name in names {
        if !seen.insert(name) && flagged.insert(name) {
            collisions.push(name.to_string());
        }
    }
    collisions
}
