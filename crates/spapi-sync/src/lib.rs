//! Incremental reconciliation of fetched records into per-partition state.
//!
//! A [`Reconciler`] compares each fetched record's [`Fingerprint`] with the
//! stored one, writes creations and updates through a [`StateStore`], moves
//! the partition watermark forward and then publishes one [`SyncEvent`] per
//! change through an [`EventPublisher`].
//!
//! Storage and publication are pluggable:
//! - [`MemoryStateStore`] / [`MemoryEventPublisher`] for tests and embedding
//! - [`FileStateStore`] keeps one JSON document per partition
//! - [`JournalEventPublisher`] appends events to an `spapi-journal` file
//!
//! [`Fingerprint`]: spapi_canonical::Fingerprint

#![deny(missing_docs)]

/// Error types for stores, publishers and reconciliation.
pub mod error;
/// Sync events.
pub mod event;
/// File-backed state store.
pub mod file;
/// Journal-backed event publisher.
pub mod journal;
/// Business-key and ordering-field extraction.
pub mod keys;
/// In-memory collaborators.
pub mod memory;
/// Reconciliation engine.
pub mod reconcile;
/// Per-partition state.
pub mod state;
/// Collaborator traits.
pub mod traits;

pub use error::{PublishError, ReconcileError, StoreError};
pub use event::{EventKind, SyncEvent};
pub use file::FileStateStore;
pub use journal::JournalEventPublisher;
pub use keys::{KeyExtractor, RecordKeys};
pub use memory::{MemoryEventPublisher, MemoryStateStore};
pub use reconcile::{ReconcileReport, Reconciler};
pub use state::{FingerprintedRecord, PartitionSnapshot, SyncState};
pub use traits::{EventPublisher, StateStore};
