//! Output formatting utilities.

use serde_json::Value;

/// Pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// One journal event as a table row.
pub fn format_table_row(event: &Value) -> String {
    let event_id = event
        .get("event_id")
        .and_then(|v| v.get("b64"))
        .and_then(|v| v.as_str())
        .unwrap_or("?");
    let partition = event
        .get("partition")
        .and_then(|v| v.as_str())
        .unwrap_or("?");
    let kind = event.get("kind").and_then(|v| v.as_str()).unwrap_or("?");
    let key = event
        .get("record")
        .and_then(record_label)
        .unwrap_or_else(|| "?".to_string());

    format!(
        "{:<44} {:<20} {:<8} {}",
        truncate(event_id, 44),
        truncate(partition, 20),
        kind,
        key
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<44} {:<20} {:<8} {}",
        "EVENT_ID", "PARTITION", "KIND", "RECORD"
    );
    println!("{}", "-".repeat(96));
}

/// Short label for a record: its first string-valued field ending in `Id`.
fn record_label(record: &Value) -> Option<String> {
    record.as_object()?.iter().find_map(|(name, value)| {
        if name.ends_with("Id") || name.ends_with("_id") || name == "sku" {
            value.as_str().map(|v| format!("{}={}", name, v))
        } else {
            None
        }
    })
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
