//! AWS Signature Version 4 request signing.
//!
//! The signature covers the method, canonical path, canonical query, the
//! header set present at signing time, and the SHA-256 of the JSON body.
//! Headers added after [`RequestSigner::sign`] are not covered; callers must
//! finalize headers first.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use spapi_canonical::{
    canonical_header_block, canonical_query_string, canonical_uri, signed_header_list,
};
use tracing::debug;

use crate::credentials::Credentials;
use crate::region::RegionTable;
use crate::request::Request;

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
/// Service name in the credential scope.
pub const SERVICE: &str = "execute-api";
/// Credential scope terminator.
pub const TERMINATION_STRING: &str = "aws4_request";

/// Header carrying the computed credential. Never part of the signed set.
const AUTHORIZATION: &str = "authorization";

/// Attaches an authorization header to a finalized request.
pub trait RequestSigner {
    /// Signs `request` in place.
    fn sign(&self, request: &mut Request, credentials: &Credentials);
}

/// SigV4 signer scoped to one service name and region table.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    service: String,
    regions: RegionTable,
}

impl Default for SigV4Signer {
    fn default() -> Self {
        Self {
            service: SERVICE.to_string(),
            regions: RegionTable::default(),
        }
    }
}

impl SigV4Signer {
    /// Signer for `execute-api` with the default region table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Overrides the endpoint to region table.
    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }

    /// Region the request is signed for.
    pub fn region<'a>(&'a self, request: &Request) -> &'a str {
        self.regions.region_for(request.endpoint())
    }

    /// `YYYYMMDD/region/service/aws4_request`.
    pub fn scope(&self, request: &Request) -> String {
        format!(
            "{}/{}/{}/{}",
            short_date(request),
            self.region(request),
            self.service,
            TERMINATION_STRING
        )
    }

    /// Canonical request string (step 1).
    pub fn canonical_request(&self, request: &Request) -> String {
        let headers: Vec<(&String, &String)> = signable_headers(request).collect();
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method().as_str(),
            canonical_uri(request.path()),
            canonical_query_string(request.query()),
            canonical_header_block(headers.iter().copied()),
            signed_header_list(headers.iter().copied()),
            sha256_hex(&request.body_bytes()),
        )
    }

    /// String to sign (step 3) for an already hashed canonical request.
    pub fn string_to_sign(&self, request: &Request, hashed_canonical_request: &str) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date(request),
            self.scope(request),
            hashed_canonical_request
        )
    }

    /// Full `Authorization` value for `request`, without mutating it.
    pub fn authorization(&self, request: &Request, credentials: &Credentials) -> String {
        let canonical_request = self.canonical_request(request);
        let string_to_sign = self.string_to_sign(request, &sha256_hex(canonical_request.as_bytes()));

        let signing_key = derive_signing_key(
            credentials.access_secret(),
            &short_date(request),
            self.region(request),
            &self.service,
        );
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            credentials.access_key(),
            self.scope(request),
            signed_header_list(signable_headers(request)),
            signature
        )
    }
}

impl RequestSigner for SigV4Signer {
    fn sign(&self, request: &mut Request, credentials: &Credentials) {
        let authorization = self.authorization(request, credentials);
        debug!(
            method = %request.method(),
            path = request.path(),
            region = self.region(request),
            "signed request"
        );
        request.set_header(AUTHORIZATION, &authorization);
    }
}

/// Chained HMAC derivation of the signing key (step 4).
///
/// `kDate = HMAC("AWS4" + secret, date)`, then region, service and the
/// termination string, each keyed by the previous binary output.
pub fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> [u8; 32] {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, TERMINATION_STRING.as_bytes())
}

fn signable_headers(request: &Request) -> impl Iterator<Item = (&String, &String)> {
    request
        .headers()
        .iter()
        .filter(|(name, _)| name.as_str() != AUTHORIZATION)
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn short_date(request: &Request) -> String {
    request.issued_at().format("%Y%m%d").to_string()
}

fn amz_date(request: &Request) -> String {
    request.issued_at().format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use chrono::{TimeZone, Utc};

    fn request() -> Request {
        Request::builder(
            "https://sellingpartnerapi-eu.amazon.com",
            Method::Get,
            "/orders/v0/orders",
        )
        .issued_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        .header("host", "sellingpartnerapi-eu.amazon.com")
        .header("x-amz-date", "20240501T120000Z")
        .build()
    }

    #[test]
    fn published_signing_key_vector() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn scope_uses_request_date_and_region() {
        let signer = SigV4Signer::new();
        assert_eq!(
            signer.scope(&request()),
            "20240501/eu-west-1/execute-api/aws4_request"
        );
    }

    #[test]
    fn canonical_request_has_blank_line_after_headers() {
        let canonical = SigV4Signer::new().canonical_request(&request());
        assert!(canonical.contains("x-amz-date:20240501T120000Z\n\nhost;x-amz-date\n"));
        assert!(canonical.ends_with(&sha256_hex(b"{}")));
    }

    #[test]
    fn resigning_ignores_existing_authorization_header() {
        let signer = SigV4Signer::new();
        let creds = Credentials::new("AKIDEXAMPLE", "secret");
        let mut req = request();

        signer.sign(&mut req, &creds);
        let first = req.header("authorization").map(str::to_string);
        signer.sign(&mut req, &creds);

        assert_eq!(req.header("authorization").map(str::to_string), first);
        assert!(!first.unwrap_or_default().contains("authorization;"));
    }
}
