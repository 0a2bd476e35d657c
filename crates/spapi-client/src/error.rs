//! Error types for the request pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the `errors` array returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable error code, e.g. `InvalidInput`.
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Optional extra detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Client construction failures. Raised before any request is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required application identity fields are absent.
    #[error("missing app info ({})", .0.join(","))]
    MissingAppInfo(Vec<String>),
    /// Endpoint is empty or lacks an http(s) scheme.
    #[error("invalid endpoint: '{0}'")]
    InvalidEndpoint(String),
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON for [`ClientConfig`](crate::ClientConfig).
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Network/HTTP layer failures raised by a [`Transport`](crate::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// A header name or value could not be sent.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),
}

/// Errors surfaced by [`SpApiClient`](crate::SpApiClient) and [`Response`](crate::Response).
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    /// The call failed below HTTP status handling.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The API answered with a failure status.
    #[error("request failed with status {status} ({reason}): {} error(s)", errors.len())]
    Api {
        /// HTTP status code.
        status: u16,
        /// Reason phrase.
        reason: String,
        /// Decoded `errors` list; empty when the body carried none.
        errors: Vec<ApiError>,
    },
    /// The response body is not valid JSON.
    #[error("malformed JSON response: {source}")]
    MalformedResponse {
        /// Raw body, for diagnostics.
        body: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}
