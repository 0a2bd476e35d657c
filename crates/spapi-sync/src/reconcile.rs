use spapi_canonical::{ContentHasher, PartitionId, Record, Watermark};
use tracing::{debug, info};

use crate::error::ReconcileError;
use crate::event::{EventKind, SyncEvent};
use crate::keys::{KeyExtractor, RecordKeys};
use crate::state::FingerprintedRecord;
use crate::traits::{EventPublisher, StateStore};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// `true` when the pass initialized the partition.
    pub first_sync: bool,
    /// Records classified as created.
    pub created: usize,
    /// Records classified as updated.
    pub updated: usize,
    /// Records whose fingerprint matched.
    pub unchanged: usize,
    /// Watermark after the pass; `None` when the batch was empty.
    pub watermark: Option<Watermark>,
    /// Whether this pass moved the watermark.
    pub watermark_advanced: bool,
}

impl ReconcileReport {
    /// Events the pass published.
    pub fn events(&self) -> usize {
        self.created + self.updated
    }
}

struct Fetched {
    ordering: String,
    entry: FingerprintedRecord,
}

/// Reconciles fetched batches into a [`StateStore`] and an [`EventPublisher`].
///
/// One reconciler is one writer: `reconcile` takes `&mut self`, so passes
/// through the same instance never overlap. Callers running several
/// reconcilers over a shared store must not give two of them the same
/// partition at once.
pub struct Reconciler<S, P, K = RecordKeys> {
    store: S,
    publisher: P,
    keys: K,
    hasher: ContentHasher,
}

impl<S: StateStore, P: EventPublisher> Reconciler<S, P, RecordKeys> {
    /// Reconciler for Orders API records with the default hash profile.
    pub fn new(store: S, publisher: P) -> Self {
        Self::with_keys(store, publisher, RecordKeys::orders())
    }
}

impl<S: StateStore, P: EventPublisher, K: KeyExtractor> Reconciler<S, P, K> {
    /// Reconciler with custom key extraction.
    pub fn with_keys(store: S, publisher: P, keys: K) -> Self {
        Self {
            store,
            publisher,
            keys,
            hasher: ContentHasher::default(),
        }
    }

    /// Replaces the fingerprinting hasher.
    pub fn with_hasher(mut self, hasher: ContentHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// State store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Event publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Returns the collaborators.
    pub fn into_parts(self) -> (S, P) {
        (self.store, self.publisher)
    }

    /// Applies one fetched batch to `partition`.
    ///
    /// The first batch of a partition becomes its initial snapshot and
    /// publishes nothing. Later batches publish every `created` event, then
    /// every `updated` event, each group in ordering-field order. Events are
    /// published after all state writes, so a failure part way through may
    /// leave changes without events but never events without state.
    pub fn reconcile(
        &mut self,
        partition: &PartitionId,
        fetched: Vec<Record>,
    ) -> Result<ReconcileReport, ReconcileError> {
        if fetched.is_empty() {
            return Ok(ReconcileReport::default());
        }

        let mut batch = self.prepare(fetched)?;
        batch.sort_by(|a, b| a.ordering.cmp(&b.ordering));
        let candidate = match batch.last() {
            Some(last) => Watermark::new(last.ordering.clone()),
            None => return Ok(ReconcileReport::default()),
        };

        let Some(state) = self.store.load_state(partition)? else {
            let entries: Vec<FingerprintedRecord> =
                batch.into_iter().map(|fetched| fetched.entry).collect();
            self.store.insert_initial_state(
                partition,
                &entries,
                &candidate,
                self.hasher.profile(),
            )?;
            info!(
                partition = %partition,
                records = entries.len(),
                watermark = %candidate,
                "partition initialized"
            );
            return Ok(ReconcileReport {
                first_sync: true,
                watermark: Some(candidate),
                watermark_advanced: true,
                ..ReconcileReport::default()
            });
        };

        if state.profile != self.hasher.profile() {
            return Err(ReconcileError::ProfileMismatch {
                partition: partition.clone(),
                stored: state.profile,
                active: self.hasher.profile(),
            });
        }

        let mut known = state.fingerprints;
        let mut created = Vec::new();
        let mut updated = Vec::new();
        let mut unchanged = 0;

        for Fetched { entry, .. } in batch {
            match known.get(&entry.key) {
                None => {
                    debug!(partition = %partition, key = %entry.key, "created");
                    self.store.add_record(partition, &entry)?;
                    known.insert(entry.key.clone(), entry.fingerprint.clone());
                    created.push(entry.record);
                }
                Some(stored) if *stored != entry.fingerprint => {
                    debug!(partition = %partition, key = %entry.key, "updated");
                    self.store.update_record(partition, &entry)?;
                    known.insert(entry.key.clone(), entry.fingerprint.clone());
                    updated.push(entry.record);
                }
                Some(_) => unchanged += 1,
            }
        }

        let changed = !created.is_empty() || !updated.is_empty();
        let advance = changed && candidate > state.watermark;
        if advance {
            self.store.advance_watermark(partition, &candidate)?;
        }

        let report = ReconcileReport {
            first_sync: false,
            created: created.len(),
            updated: updated.len(),
            unchanged,
            watermark: Some(if advance { candidate } else { state.watermark }),
            watermark_advanced: advance,
        };

        let events = created
            .into_iter()
            .map(|record| (EventKind::Created, record))
            .chain(updated.into_iter().map(|record| (EventKind::Updated, record)));
        for (kind, record) in events {
            self.publisher.publish(&SyncEvent {
                partition: partition.clone(),
                kind,
                record,
            })?;
        }

        info!(
            partition = %partition,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            watermark_advanced = report.watermark_advanced,
            "partition reconciled"
        );
        Ok(report)
    }

    /// Extracts keys and fingerprints for the whole batch, failing on the
    /// first unusable record before anything is written.
    fn prepare(&self, fetched: Vec<Record>) -> Result<Vec<Fetched>, ReconcileError> {
        let mut batch = Vec::with_capacity(fetched.len());
        for (index, record) in fetched.into_iter().enumerate() {
            let key = self
                .keys
                .business_key(&record)
                .ok_or_else(|| ReconcileError::InvalidRecord {
                    index,
                    reason: "missing business key".to_string(),
                })?;
            let ordering = self
                .keys
                .ordering(&record)
                .ok_or_else(|| ReconcileError::InvalidRecord {
                    index,
                    reason: "missing ordering value".to_string(),
                })?;
            let fingerprint = self.hasher.hash(&record)?;
            batch.push(Fetched {
                ordering,
                entry: FingerprintedRecord {
                    key,
                    fingerprint,
                    record,
                },
            });
        }
        Ok(batch)
    }
}
