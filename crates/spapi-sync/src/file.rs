use spapi_canonical::{HashProfile, PartitionId, Watermark};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;
use crate::state::{FingerprintedRecord, PartitionSnapshot, SyncState};
use crate::traits::StateStore;

/// State store keeping one JSON document per partition in a directory.
///
/// Every write replaces the document through a temporary file and a rename,
/// so a crash leaves either the old or the new document. Partitions live in
/// separate files and can be reconciled by separate processes.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Store rooted at `dir`, created if missing.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the document for `partition`.
    ///
    /// Ids are re-checked against the partition pattern, so an id built with
    /// `PartitionId::new` cannot name a path outside the store directory.
    pub fn path_for(&self, partition: &PartitionId) -> Result<PathBuf, StoreError> {
        let checked = PartitionId::parse(partition.as_str())?;
        if checked.as_str().chars().all(|c| c == '.') {
            return Err(StoreError::Other(format!(
                "partition id {:?} names no document",
                checked.as_str()
            )));
        }
        Ok(self.dir.join(format!("{}.json", checked)))
    }

    /// Full stored snapshot of one partition.
    pub fn snapshot(&self, partition: &PartitionId) -> Result<Option<PartitionSnapshot>, StoreError> {
        let path = self.path_for(partition)?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn write(&self, partition: &PartitionId, snapshot: &PartitionSnapshot) -> Result<(), StoreError> {
        let path = self.path_for(partition)?;
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, snapshot)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        debug!(partition = %partition, entries = snapshot.entries.len(), "state written");
        Ok(())
    }

    fn modify(
        &self,
        partition: &PartitionId,
        f: impl FnOnce(&mut PartitionSnapshot),
    ) -> Result<(), StoreError> {
        let mut snapshot = self
            .snapshot(partition)?
            .ok_or_else(|| StoreError::NotInitialized(partition.clone()))?;
        f(&mut snapshot);
        self.write(partition, &snapshot)
    }
}

impl StateStore for FileStateStore {
    fn load_state(&self, partition: &PartitionId) -> Result<Option<SyncState>, StoreError> {
        Ok(self.snapshot(partition)?.map(|snapshot| snapshot.to_state()))
    }

    fn insert_initial_state(
        &mut self,
        partition: &PartitionId,
        records: &[FingerprintedRecord],
        watermark: &Watermark,
        profile: HashProfile,
    ) -> Result<(), StoreError> {
        if self.path_for(partition)?.exists() {
            return Err(StoreError::AlreadyInitialized(partition.clone()));
        }
        self.write(partition, &PartitionSnapshot::initial(records, watermark, profile))
    }

    fn add_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError> {
        self.modify(partition, |snapshot| snapshot.put(record))
    }

    fn update_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError> {
        self.modify(partition, |snapshot| snapshot.put(record))
    }

    fn advance_watermark(
        &mut self,
        partition: &PartitionId,
        watermark: &Watermark,
    ) -> Result<(), StoreError> {
        self.modify(partition, |snapshot| snapshot.watermark = watermark.clone())
    }
}
