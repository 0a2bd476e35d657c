//! Event ID computation with domain-separated hashing.
//!
//! Event IDs are computed as: `sha256(domain_separator || rfc8785(event))`
//! where the `event_id` field is excluded from the hash input.

use crate::canonicalizer::{rfc8785_bytes, CanonicalizationError};
use crate::Digest;
use serde::Serialize;
use serde_json::Value;

/// Domain separator for sync event IDs: `b"spapi:sync-event:v1\0"`.
const EVENT_DOMAIN_SEPARATOR: &[u8] = b"spapi:sync-event:v1\0";

/// Computes the event ID for a sync event.
///
/// # Example
///
/// ```rust
/// use spapi_canonical::compute_event_id;
/// use serde_json::json;
///
/// let event = json!({
///     "partition": "A1B2C3",
///     "kind": "created",
///     "record": {"AmazonOrderId": "123-4567890-1234567"}
/// });
///
/// let event_id = compute_event_id(&event)?;
/// assert_eq!(event_id.b64.len(), 43);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`EventIdError`] if serialization or canonicalization fails.
pub fn compute_event_id<T: Serialize>(event: &T) -> Result<Digest, EventIdError> {
    let mut value: Value =
        serde_json::to_value(event).map_err(|e| EventIdError::Serialization(e.to_string()))?;

    // Remove event_id to avoid self-referential hashing
    if let Value::Object(map) = &mut value {
        map.remove("event_id");
    }

    let bytes = rfc8785_bytes(&value)?;
    Ok(Digest::sha256(&[EVENT_DOMAIN_SEPARATOR, &bytes]))
}

/// Error during event ID computation.
#[derive(thiserror::Error, Debug)]
pub enum EventIdError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Verifies that a claimed event_id matches the computed event_id.
pub fn verify_event_id<T: Serialize>(event: &T, claimed_id: &Digest) -> Result<bool, EventIdError> {
    let computed_id = compute_event_id(event)?;
    Ok(claimed_id == &computed_id)
}
