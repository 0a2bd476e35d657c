//! Collaborator traits consumed by the reconciler.
//!
//! Both collaborators are called synchronously; timeouts and retries are
//! theirs to implement.

use spapi_canonical::{HashProfile, PartitionId, Watermark};

use crate::error::{PublishError, StoreError};
use crate::event::SyncEvent;
use crate::state::{FingerprintedRecord, SyncState};

/// Durable per-partition fingerprints and watermark.
///
/// `add_record` and `update_record` must be idempotent: writing the same
/// key and fingerprint twice leaves the same state.
pub trait StateStore {
    /// State of `partition`, or `None` before its first sync.
    fn load_state(&self, partition: &PartitionId) -> Result<Option<SyncState>, StoreError>;

    /// Creates the partition with its first snapshot.
    fn insert_initial_state(
        &mut self,
        partition: &PartitionId,
        records: &[FingerprintedRecord],
        watermark: &Watermark,
        profile: HashProfile,
    ) -> Result<(), StoreError>;

    /// Stores a record under a new business key.
    fn add_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError>;

    /// Replaces the record and fingerprint of a known business key.
    fn update_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError>;

    /// Sets the partition watermark.
    fn advance_watermark(
        &mut self,
        partition: &PartitionId,
        watermark: &Watermark,
    ) -> Result<(), StoreError>;
}

/// Sink for sync events.
pub trait EventPublisher {
    /// Publishes one event. Failures are not retried by the caller.
    fn publish(&mut self, event: &SyncEvent) -> Result<(), PublishError>;
}

impl<T: StateStore + ?Sized> StateStore for &mut T {
    fn load_state(&self, partition: &PartitionId) -> Result<Option<SyncState>, StoreError> {
        (**self).load_state(partition)
    }

    fn insert_initial_state(
        &mut self,
        partition: &PartitionId,
        records: &[FingerprintedRecord],
        watermark: &Watermark,
        profile: HashProfile,
    ) -> Result<(), StoreError> {
        (**self).insert_initial_state(partition, records, watermark, profile)
    }

    fn add_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError> {
        (**self).add_record(partition, record)
    }

    fn update_record(
        &mut self,
        partition: &PartitionId,
        record: &FingerprintedRecord,
    ) -> Result<(), StoreError> {
        (**self).update_record(partition, record)
    }

    fn advance_watermark(
        &mut self,
        partition: &PartitionId,
        watermark: &Watermark,
    ) -> Result<(), StoreError> {
        (**self).advance_watermark(partition, watermark)
    }
}

impl<T: EventPublisher + ?Sized> EventPublisher for &mut T {
    fn publish(&mut self, event: &SyncEvent) -> Result<(), PublishError> {
        (**self).publish(event)
    }
}
