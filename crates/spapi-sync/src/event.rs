use serde::{Deserialize, Serialize};
use spapi_canonical::{compute_event_id, Digest, EventIdError, PartitionId, Record};
use spapi_journal::EventJson;
use std::fmt;

use crate::error::PublishError;

/// State transition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Business key not seen before in the partition.
    Created,
    /// Known business key whose fingerprint changed.
    Updated,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Created => f.write_str("created"),
            EventKind::Updated => f.write_str("updated"),
        }
    }
}

/// Immutable fact emitted for one create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Partition the record belongs to.
    pub partition: PartitionId,
    /// Transition kind.
    pub kind: EventKind,
    /// Record as fetched.
    pub record: Record,
}

impl SyncEvent {
    /// Content-derived identifier of this event.
    pub fn event_id(&self) -> Result<Digest, EventIdError> {
        compute_event_id(self)
    }

    /// JSON form written to a journal: the event plus its `event_id`.
    pub fn to_journal_json(&self) -> Result<EventJson, PublishError> {
        let event_id = self.event_id()?;
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("event_id".to_string(), serde_json::to_value(event_id)?);
        }
        Ok(value)
    }
}
