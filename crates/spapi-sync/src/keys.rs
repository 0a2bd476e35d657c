use serde::{Deserialize, Serialize};
use serde_json::Value;
use spapi_canonical::Record;

/// Pulls the identifying and ordering values out of a record.
pub trait KeyExtractor {
    /// Business key, or `None` when the record has no usable one.
    fn business_key(&self, record: &Record) -> Option<String>;

    /// Ordering value; must sort lexicographically in update order.
    fn ordering(&self, record: &Record) -> Option<String>;
}

/// Field names holding the business key and the ordering value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKeys {
    /// Business key field, e.g. `AmazonOrderId`.
    pub business_key: String,
    /// Ordering field, e.g. `LastUpdateDate`.
    pub ordering: String,
}

impl RecordKeys {
    /// Keys read from the given top-level fields.
    pub fn new(business_key: impl Into<String>, ordering: impl Into<String>) -> Self {
        Self {
            business_key: business_key.into(),
            ordering: ordering.into(),
        }
    }

    /// Orders API: `AmazonOrderId` / `LastUpdateDate`.
    pub fn orders() -> Self {
        Self::new("AmazonOrderId", "LastUpdateDate")
    }
}

impl Default for RecordKeys {
    fn default() -> Self {
        Self::orders()
    }
}

impl KeyExtractor for RecordKeys {
    fn business_key(&self, record: &Record) -> Option<String> {
        match record.get(&self.business_key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn ordering(&self, record: &Record) -> Option<String> {
        record
            .get(&self.ordering)?
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn order_preset_reads_order_fields() {
        let keys = RecordKeys::orders();
        let order = record(json!({"AmazonOrderId": "902-1", "LastUpdateDate": "2024-05-01T10:00:00Z"}));
        assert_eq!(keys.business_key(&order).as_deref(), Some("902-1"));
        assert_eq!(keys.ordering(&order).as_deref(), Some("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn numeric_keys_are_accepted_but_blank_or_nested_are_not() {
        let keys = RecordKeys::new("id", "ts");
        assert_eq!(keys.business_key(&record(json!({"id": 42}))).as_deref(), Some("42"));
        assert!(keys.business_key(&record(json!({"id": ""}))).is_none());
        assert!(keys.business_key(&record(json!({"id": {"x": 1}}))).is_none());
        assert!(keys.ordering(&record(json!({"ts": 1714557600}))).is_none());
    }
}
