//! Fingerprint command implementation.

use serde_json::Value;
use spapi_canonical::ContentHasher;

use crate::input;

pub fn run(
    input: Option<String>,
    deep: bool,
    key_field: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = input::records_from_value(input::read_json(input.as_deref())?)?;
    let hasher = ContentHasher::new(super::profile(deep));

    for record in &records {
        let fingerprint = hasher.hash(record)?;
        match record.get(&key_field) {
            Some(Value::String(key)) => println!("{}  {}", fingerprint, key),
            Some(key) => println!("{}  {}", fingerprint, key),
            None => println!("{}", fingerprint),
        }
    }
    Ok(())
}
