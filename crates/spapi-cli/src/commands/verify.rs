//! Verify command implementation.

use serde_json::json;
use spapi_journal::{is_valid_event_structure, verify_event_id, JournalReader, ReadMode};

use crate::output::truncate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Ok,
    Mismatch,
    Invalid,
}

pub fn run(journal: String, strict: bool, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = JournalReader::open(&journal, ReadMode::Strict)
        .map_err(|e| format!("Failed to open journal: {}", e))?;

    let mut results = Vec::new();
    while let Some(event) = reader.read_event()? {
        let event_id = event
            .get("event_id")
            .and_then(|v| v.get("b64"))
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();
        let kind = event
            .get("kind")
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();

        let verdict = if !is_valid_event_structure(&event) {
            Verdict::Invalid
        } else {
            match verify_event_id(&event) {
                Ok(true) => Verdict::Ok,
                Ok(false) => Verdict::Mismatch,
                Err(e) => {
                    if !json_output {
                        eprintln!("Error verifying {}: {}", event_id, e);
                    }
                    Verdict::Invalid
                }
            }
        };
        results.push((event_id, kind, verdict));
    }

    let all_ok = results.iter().all(|(_, _, verdict)| *verdict == Verdict::Ok);

    if json_output {
        let json_results: Vec<_> = results
            .iter()
            .map(|(id, kind, verdict)| {
                json!({
                    "event_id": id,
                    "kind": kind,
                    "verdict": format!("{:?}", verdict)
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    } else {
        println!("{:<44} {:<8} {}", "EVENT_ID", "KIND", "VERDICT");
        println!("{}", "-".repeat(64));
        for (id, kind, verdict) in &results {
            println!("{:<44} {:<8} {:?}", truncate(id, 44), kind, verdict);
        }
    }

    if strict && !all_ok {
        return Err(format!(
            "{} of {} events failed verification",
            results.iter().filter(|(_, _, v)| *v != Verdict::Ok).count(),
            results.len()
        )
        .into());
    }

    Ok(())
}
