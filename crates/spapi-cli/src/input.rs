//! Input loading shared by commands.

use serde_json::Value;
use spapi_canonical::Record;
use std::io::{self, Read};
use thiserror::Error;

/// Problems with command input.
#[derive(Error, Debug)]
pub enum InputError {
    /// File or stdin could not be read.
    #[error("failed to read {source_name}: {source}")]
    Read {
        /// File path or `stdin`.
        source_name: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Input is not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// JSON is not a record or a list of records.
    #[error("expected a JSON object, an array of objects or an Orders response; {0}")]
    Shape(String),
    /// `key=value` argument without `=`.
    #[error("expected KEY=VALUE, got '{0}'")]
    Pair(String),
}

/// Reads a file, or stdin when no path is given.
pub fn read_text(path: Option<&str>) -> Result<String, InputError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| InputError::Read {
            source_name: path.to_string(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| InputError::Read {
                    source_name: "stdin".to_string(),
                    source,
                })?;
            Ok(buffer)
        }
    }
}

/// Reads and parses JSON from a file or stdin.
pub fn read_json(path: Option<&str>) -> Result<Value, InputError> {
    Ok(serde_json::from_str(&read_text(path)?)?)
}

/// Records in `value`: an array of objects, a single object, or an Orders
/// API response (`{"payload": {"Orders": [...]}}`).
pub fn records_from_value(value: Value) -> Result<Vec<Record>, InputError> {
    let value = match value {
        Value::Object(mut map) if map.contains_key("payload") => {
            map.remove("payload").unwrap_or(Value::Null)
        }
        other => other,
    };
    let value = match value {
        Value::Object(mut map) if map.get("Orders").map_or(false, Value::is_array) => {
            map.remove("Orders").unwrap_or(Value::Null)
        }
        other => other,
    };

    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(InputError::Shape(format!(
                    "item {} is {}",
                    idx,
                    kind_of(&other)
                ))),
            })
            .collect(),
        other => Err(InputError::Shape(format!("got {}", kind_of(&other)))),
    }
}

/// Parses a `KEY=VALUE` argument; the value may itself contain `=`.
pub fn parse_pair(raw: &str) -> Result<(String, String), InputError> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| InputError::Pair(raw.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
