//! List command implementation.

use spapi_journal::{JournalReader, ReadMode};

use crate::output;

pub fn run(
    journal: String,
    json: bool,
    max_events: Option<u64>,
    permissive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode = if permissive {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };
    let mut reader = JournalReader::open(&journal, mode)
        .map_err(|e| format!("Failed to open journal file: {}: {}", journal, e))?;

    if !json {
        output::print_table_header();
    }

    let mut event_count: u64 = 0;
    while let Some(event) = reader.read_event()? {
        if max_events.map_or(false, |max| event_count >= max) {
            break;
        }

        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", output::format_table_row(&event));
        }
        event_count += 1;
    }

    Ok(())
}
