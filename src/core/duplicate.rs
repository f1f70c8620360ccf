use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::hash::Fingerprint;
use crate::core::store::PhotoRecord;

/// All records sharing one fingerprint. Only materialized when at least
/// two records collide; derived from the record store on every run, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateSet {
    pub fingerprint: Fingerprint,
    pub records: Vec<PhotoRecord>,
}

/// Partition records by fingerprint and keep buckets with two or more
/// entries. Pure function of the record snapshot. Sets come back sorted
/// by fingerprint ascending; records inside a set keep their
/// accumulation order, so output is reproducible run to run.
pub fn group_duplicates(records: &[PhotoRecord]) -> Vec<DuplicateSet> {
    let mut buckets: BTreeMap<&Fingerprint, Vec<&PhotoRecord>> = BTreeMap::new();
    for record in records {
        buckets.entry(&record.fingerprint).or_default().push(record);
    }
    buckets
        .into_iter()
        .filter(|(_, bucket)| bucket.len() >= 2)
        .map(|(fingerprint, bucket)| DuplicateSet {
            fingerprint: fingerprint.clone(),
            records: bucket.into_iter().cloned().collect(),
        })
        .collect()
}
