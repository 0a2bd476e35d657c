//! Error types for stores, publishers and reconciliation.

use spapi_canonical::{
    CanonicalizationError, EventIdError, HashProfile, PartitionId, ValidationError,
};
use thiserror::Error;

/// State store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while reading or writing state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored state is not valid JSON for this format.
    #[error("corrupt state: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// An operation other than initialization targeted an unknown partition.
    #[error("partition {0} is not initialized")]
    NotInitialized(PartitionId),
    /// Initialization targeted a partition that already has state.
    #[error("partition {0} is already initialized")]
    AlreadyInitialized(PartitionId),
    /// Partition id cannot name a state document.
    #[error("invalid partition id: {0}")]
    InvalidPartition(#[from] ValidationError),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Event publication failures.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] spapi_journal::JournalError),
    /// Event could not be serialized or identified.
    #[error("event encoding failed: {0}")]
    Encoding(String),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<EventIdError> for PublishError {
    fn from(err: EventIdError) -> Self {
        PublishError::Encoding(err.to_string())
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::Encoding(err.to_string())
    }
}

/// Reconciliation failures. Any of them aborts the rest of the batch.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A record lacks a usable business key or ordering value.
    ///
    /// Detected for the whole batch before any state is touched.
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord {
        /// Position of the record in the fetched batch.
        index: usize,
        /// What is missing or malformed.
        reason: String,
    },
    /// Record could not be canonicalized for fingerprinting.
    #[error("fingerprinting failed: {0}")]
    Hash(#[from] CanonicalizationError),
    /// Stored fingerprints were produced with another hash profile.
    #[error(
        "partition {partition} was fingerprinted with {stored:?} but the reconciler uses {active:?}; \
         re-initialize the partition to migrate"
    )]
    ProfileMismatch {
        /// Partition being reconciled.
        partition: PartitionId,
        /// Profile recorded in the stored state.
        stored: HashProfile,
        /// Profile of the reconciler's hasher.
        active: HashProfile,
    },
    /// Persisting state failed.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
    /// Publishing an event failed.
    #[error("event publisher error: {0}")]
    Publish(#[from] PublishError),
}
