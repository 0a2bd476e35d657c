use serde::{Deserialize, Serialize};
use spapi_canonical::{Fingerprint, HashProfile, Record, Watermark};
use std::collections::BTreeMap;

/// Per-partition view the reconciler works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// Business key to stored fingerprint.
    pub fingerprints: BTreeMap<String, Fingerprint>,
    /// Largest ordering value recorded by a pass that changed something.
    pub watermark: Watermark,
    /// Profile the stored fingerprints were computed with.
    #[serde(default)]
    pub profile: HashProfile,
}

/// A record with its business key and fingerprint, as handed to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintedRecord {
    /// Business key.
    pub key: String,
    /// Content fingerprint.
    pub fingerprint: Fingerprint,
    /// Full record as fetched.
    pub record: Record,
}

/// Everything a store keeps for one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    /// Current watermark.
    pub watermark: Watermark,
    /// Profile the fingerprints were computed with.
    #[serde(default)]
    pub profile: HashProfile,
    /// Business key to latest record.
    pub entries: BTreeMap<String, FingerprintedRecord>,
}

impl PartitionSnapshot {
    /// Snapshot of a first sync; later duplicates of a key win.
    pub fn initial(records: &[FingerprintedRecord], watermark: &Watermark, profile: HashProfile) -> Self {
        Self {
            watermark: watermark.clone(),
            profile,
            entries: records
                .iter()
                .map(|entry| (entry.key.clone(), entry.clone()))
                .collect(),
        }
    }

    /// Inserts or replaces the entry for `record.key`.
    pub fn put(&mut self, record: &FingerprintedRecord) {
        self.entries.insert(record.key.clone(), record.clone());
    }

    /// The reconciler's view of this snapshot.
    pub fn to_state(&self) -> SyncState {
        SyncState {
            fingerprints: self
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.fingerprint.clone()))
                .collect(),
            watermark: self.watermark.clone(),
            profile: self.profile,
        }
    }
}
