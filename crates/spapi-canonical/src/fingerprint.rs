//! Content fingerprints used to detect record changes without keeping the
//! previous record around.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::canonicalizer::{CanonicalizationError, Canonicalizer, HashProfile};
use crate::validation::ValidationError;
use crate::Record;

/// Number of SHA-256 output bytes kept in a fingerprint (128 bits).
const FINGERPRINT_BYTES: usize = 16;

/// 128-bit content digest of a record's canonical bytes, lower-case hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints raw canonical bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(hex::encode(&digest[..FINGERPRINT_BYTES]))
    }

    /// Parses a stored fingerprint (32 lower-case hex characters).
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Regex::new(r"^[0-9a-f]{32}$").expect("invalid regex").is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "Fingerprint",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes record fingerprints under a fixed [`HashProfile`].
#[derive(Debug, Clone, Default)]
pub struct ContentHasher {
    canonicalizer: Canonicalizer,
}

impl ContentHasher {
    /// Creates a hasher for the given profile.
    pub fn new(profile: HashProfile) -> Self {
        Self {
            canonicalizer: Canonicalizer::new(profile),
        }
    }

    /// Profile the hasher canonicalizes with.
    pub fn profile(&self) -> HashProfile {
        self.canonicalizer.profile()
    }

    /// Fingerprint of `record`.
    pub fn hash(&self, record: &Record) -> Result<Fingerprint, CanonicalizationError> {
        let bytes = self.canonicalizer.canonicalize(record)?;
        Ok(Fingerprint::of_bytes(&bytes))
    }
}
