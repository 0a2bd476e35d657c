//! Canonicalize command implementation.

use serde_json::Value;
use spapi_canonical::Canonicalizer;

use crate::input;

pub fn run(input: Option<String>, deep: bool) -> Result<(), Box<dyn std::error::Error>> {
    let record = match input::read_json(input.as_deref())? {
        Value::Object(map) => map,
        _ => return Err("Input must be a JSON object".into()),
    };

    let bytes = Canonicalizer::new(super::profile(deep))
        .canonicalize(&record)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
