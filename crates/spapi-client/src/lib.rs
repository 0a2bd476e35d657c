//! Signed request pipeline for the Selling Partner API.
//!
//! A [`Request`] is built once, signed with AWS Signature Version 4 by a
//! [`RequestSigner`], and dispatched through a [`Transport`]. The signer and
//! the transport read the same body bytes and the same canonical query, so
//! what is signed is exactly what is sent.
//!
#![deny(missing_docs)]

/// Configured client and its collaborators.
pub mod client;
/// Access key material.
pub mod credentials;
/// Error types.
pub mod error;
/// Endpoint to region mapping.
pub mod region;
/// Report documents.
pub mod report;
/// Outbound request descriptor.
pub mod request;
/// Inbound response accessor.
pub mod response;
/// SigV4 signing.
pub mod signing;
/// HTTP execution.
pub mod transport;

pub use client::{AppInfo, ClientConfig, Clock, FixedClock, SpApiClient, SystemClock};
pub use credentials::Credentials;
pub use error::{ApiError, ClientError, ConfigError, TransportError};
pub use region::{RegionTable, DEFAULT_REGION};
pub use report::{parse_report, ReportDocument, ReportError, ReportType};
pub use request::{Body, Method, Request, RequestBuilder};
pub use response::Response;
pub use signing::{derive_signing_key, RequestSigner, SigV4Signer};
pub use transport::{RawResponse, ReqwestTransport, Transport};
