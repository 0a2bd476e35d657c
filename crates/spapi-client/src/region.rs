//! Endpoint to signing-region mapping.

use crate::request::host_of;

/// Region used for endpoints that are not in the table.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Endpoint host labels and the region their requests are signed for.
const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("sellingpartnerapi-na", "us-east-1"),
    ("sellingpartnerapi-eu", "eu-west-1"),
    ("sellingpartnerapi-fe", "us-west-1"),
];

/// Lookup table from endpoint host label to AWS region.
///
/// An endpoint matches an entry when any dot-separated label of its host
/// equals the entry's label, so sandbox hosts such as
/// `sandbox.sellingpartnerapi-na.amazon.com` resolve like production ones.
/// Unknown endpoints resolve to the fallback region instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    entries: Vec<(String, String)>,
    fallback: String,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|(label, region)| (label.to_string(), region.to_string()))
                .collect(),
            fallback: DEFAULT_REGION.to_string(),
        }
    }
}

impl RegionTable {
    /// Adds or replaces an entry.
    pub fn with_entry(mut self, label: impl Into<String>, region: impl Into<String>) -> Self {
        let label = label.into();
        self.entries.retain(|(existing, _)| *existing != label);
        self.entries.push((label, region.into()));
        self
    }

    /// Replaces the fallback region.
    pub fn with_fallback(mut self, region: impl Into<String>) -> Self {
        self.fallback = region.into();
        self
    }

    /// Region for an endpoint such as `https://sellingpartnerapi-na.amazon.com`.
    pub fn region_for(&self, endpoint: &str) -> &str {
        let host = host_of(endpoint).to_ascii_lowercase();
        let host = host.split(':').next().unwrap_or_default();
        host.split('.')
            .find_map(|label| {
                self.entries
                    .iter()
                    .find(|(entry, _)| entry == label)
                    .map(|(_, region)| region.as_str())
            })
            .unwrap_or(&self.fallback)
    }
}
