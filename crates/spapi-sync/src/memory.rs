use spapi_canonical::{HashProfile, PartitionId, Watermark};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{PublishError, StoreError};
use crate::event::SyncEvent;
use crate::state::{FingerprintedRecord, PartitionSnapshot, SyncState};
use crate::traits::{EventPublisher, StateStore};

type Partitions = BTreeMap<PartitionId, PartitionSnapshot>;

/// Process-local state store.
///
/// Clones share the same partitions, so one store can back several
/// reconcilers working on distinct partitions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    partitions: Arc<Mutex<Partitions>>,
}

impl MemoryStateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of one partition's snapshot.
    pub fn snapshot(&self, partition: &PartitionId) -> Result<Option<PartitionSnapshot>, StoreError> {
        Ok(self.lock()?.get(partition).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Partitions>, StoreError> {
        self.partitions
            .lock()
            .map_err(|_| StoreError::Other("memory store lock poisoned".to_string()))
    }

    fn with_partition(
        &self,
        partition: &PartitionId,
        f: impl FnOnce(&mut PartitionSnapshot),
    ) -> Result<(), StoreError> {
        let mut partitions = self.lock()?;
        let snapshot = partitions
            .get_mut(partition)
            .ok_or_else(|| StoreError::NotInitialized(partition.clone()))?;
        f(snapshot);
        Ok(())
    }
}

impl StateStore for MemoryStateStore {
    fn load_state(&self, partition: &PartitionId) -> Result<Option<SyncState>, StoreError> {
        Ok(self.lock()?.get(partition).map(PartitionSnapshot::to_state))
    }

    fn insert_initial_state(
        &mut self,
        partition: &PartitionId,
        records: &[FingerprintedRecord],
        watermark: &Watermark,
        profile: HashProfile,
    ) -> Result<(), StoreError> {
        let mut partitions = self.lock()?;
        if partitions.contains_key(partition) {
            return Err(StoreError::AlreadyInitialized(partition.clone()));
        }
        partitions.insert(
            partition.clone(),
            PartitionSnapshot::initial(records, watermark, profile),
        );
        Ok(())
    }

    fn add_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError> {
        self.with_partition(partition, |snapshot| snapshot.put(record))
    }

    fn update_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError> {
        self.with_partition(partition, |snapshot| snapshot.put(record))
    }

    fn advance_watermark(
        &mut self,
        partition: &PartitionId,
        watermark: &Watermark,
    ) -> Result<(), StoreError> {
        self.with_partition(partition, |snapshot| snapshot.watermark = watermark.clone())
    }
}

/// Publisher that keeps events in memory, in publication order.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventPublisher {
    events: Vec<SyncEvent>,
}

impl MemoryEventPublisher {
    /// Empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far.
    pub fn events(&self) -> &[SyncEvent] {
        &self.events
    }

    /// Removes and returns the published events.
    pub fn drain(&mut self) -> Vec<SyncEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventPublisher for MemoryEventPublisher {
    fn publish(&mut self, event: &SyncEvent) -> Result<(), PublishError> {
        self.events.push(event.clone());
        Ok(())
    }
}
