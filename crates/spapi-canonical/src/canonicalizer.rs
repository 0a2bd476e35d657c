use canonical_json::to_string;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::Record;

/// Bytes left unescaped by [`encode_component`]: the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Percent-encodes a single query key, query value or path segment.
///
/// Every byte outside `A-Z a-z 0-9 - _ . ~` is written as `%XX` with
/// upper-case hex digits; spaces become `%20`, never `+`.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Canonical URI for signing: each `/`-delimited segment encoded twice.
///
/// An empty path canonicalizes to `/`.
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(|segment| encode_component(&encode_component(segment)))
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonical query string: encoded `key=value` pairs sorted by key, joined by `&`.
///
/// The result does not depend on the iteration order of `pairs`. An empty
/// query yields the empty string (no leading `?`).
pub fn canonical_query_string<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut encoded: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (encode_component(k.as_ref()), encode_component(v.as_ref())))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Canonical header block: `name:value\n` per header, names lower-cased and
/// sorted, values trimmed. Always ends with a newline when non-empty.
pub fn canonical_header_block<I, K, V>(headers: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    normalize_headers(headers)
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect()
}

/// Signed-headers list: the lower-cased header names, sorted, joined by `;`.
pub fn signed_header_list<I, K, V>(headers: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    normalize_headers(headers)
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(";")
}

fn normalize_headers<I, K, V>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    headers
        .into_iter()
        .map(|(k, v)| {
            (
                k.as_ref().trim().to_ascii_lowercase(),
                v.as_ref().trim().to_string(),
            )
        })
        .collect()
}

/// How a record is turned into bytes before fingerprinting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashProfile {
    /// Top-level keys sorted; nested objects keep their received key order.
    ///
    /// Fingerprints already stored for existing partitions were produced
    /// with this profile.
    #[default]
    Shallow,
    /// RFC 8785 canonical JSON: keys sorted at every depth.
    ///
    /// Switching an existing store to this profile changes every stored
    /// fingerprint, so each partition must be re-initialized.
    Deep,
}

/// Canonicalizer that emits deterministic record bytes.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    profile: HashProfile,
}

impl Canonicalizer {
    /// Creates a new canonicalizer for the provided profile.
    pub fn new(profile: HashProfile) -> Self {
        Self { profile }
    }

    /// Returns the active profile.
    pub fn profile(&self) -> HashProfile {
        self.profile
    }

    /// Produces the canonical bytes of a record.
    pub fn canonicalize(&self, record: &Record) -> Result<Vec<u8>, CanonicalizationError> {
        match self.profile {
            HashProfile::Shallow => shallow_bytes(record),
            HashProfile::Deep => rfc8785_bytes(&Value::Object(record.clone())),
        }
    }
}

fn shallow_bytes(record: &Record) -> Result<Vec<u8>, CanonicalizationError> {
    let mut entries: Vec<(&String, &Value)> = record.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = Vec::with_capacity(64 * entries.len() + 2);
    out.push(b'{');
    for (idx, (key, value)) in entries.into_iter().enumerate() {
        if idx > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut out, key)
            .map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        out.push(b':');
        // Nested values are written in their stored order.
        serde_json::to_writer(&mut out, value)
            .map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    }
    out.push(b'}');
    Ok(out)
}

/// RFC 8785 canonical bytes of an arbitrary JSON value.
pub(crate) fn rfc8785_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let canonical =
        to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    Ok(canonical.into_bytes())
}
