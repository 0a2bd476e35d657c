use serde_json::Value;

/// One journaled event: `{partition, kind, record, event_id}`.
///
/// The journal stores payloads as-is; identity checks live in
/// [`verify_event_id`](crate::verify_event_id).
pub type EventJson = Value;

/// Kinds a sync event may carry.
const KNOWN_KINDS: &[&str] = &["created", "updated"];

/// Structural check: an object with a partition, a known kind, an object
/// record and an `event_id`.
pub fn is_valid_event_structure(value: &EventJson) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    obj.contains_key("event_id")
        && obj.get("partition").map_or(false, Value::is_string)
        && obj
            .get("kind")
            .and_then(Value::as_str)
            .map_or(false, |kind| KNOWN_KINDS.contains(&kind))
        && obj.get("record").map_or(false, Value::is_object)
}
