//! Canonical forms and content fingerprints for the SP-API client.
//!
//! Everything that feeds a hash or a signature is serialized here so that
//! semantically equal inputs always produce identical bytes: query strings,
//! header blocks and URI paths for request signing, and record bodies for
//! change detection.
//!
#![deny(missing_docs)]

/// Canonical byte forms for request components and records.
pub mod canonicalizer;
/// Digest/identifier primitives.
pub mod digest;
/// Domain-separated identifiers for journaled sync events.
pub mod event_id;
/// Content fingerprints for change detection.
pub mod fingerprint;
/// Core identifiers and newtypes.
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{
    canonical_header_block, canonical_query_string, canonical_uri, encode_component,
    signed_header_list, CanonicalizationError, Canonicalizer, HashProfile,
};
pub use digest::{Digest, DigestAlg};
pub use event_id::{compute_event_id, verify_event_id, EventIdError};
pub use fingerprint::{ContentHasher, Fingerprint};
pub use identifiers::{PartitionId, Watermark};
pub use validation::ValidationError;

/// One remote entity as decoded from the API: an ordered JSON object.
pub type Record = serde_json::Map<String, serde_json::Value>;
