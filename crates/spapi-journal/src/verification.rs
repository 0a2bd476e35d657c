//! Event identity checks.

use crate::errors::JournalError;
use crate::event::EventJson;
use spapi_canonical::{compute_event_id, Digest};

/// Recomputes an event's id and compares it with the stored `event_id`.
///
/// A missing or malformed `event_id` is an error; a well-formed id that
/// does not match is `Ok(false)`.
pub fn verify_event_id(event: &EventJson) -> Result<bool, JournalError> {
    let claimed_id = event
        .get("event_id")
        .and_then(|v| serde_json::from_value::<Digest>(v.clone()).ok())
        .ok_or_else(|| JournalError::InvalidJson("missing or invalid event_id".to_string()))?;

    let computed_id = compute_event_id(event)
        .map_err(|e| JournalError::InvalidJson(format!("event ID computation failed: {}", e)))?;

    Ok(claimed_id == computed_id)
}
