//! LWA/IAM key pair used to sign requests.

use std::fmt;

/// Access key pair.
///
/// The secret is only ever used as HMAC key material; `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    access_secret: String,
}

impl Credentials {
    /// Creates a key pair.
    pub fn new(access_key: impl Into<String>, access_secret: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Public half, included in the `Credential=` field.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub(crate) fn access_secret(&self) -> &str {
        &self.access_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}
