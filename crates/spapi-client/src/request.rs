//! Outbound request descriptor.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use spapi_canonical::{canonical_query_string, encode_component};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verb of an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Parses a verb case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of a request: always an object or an array.
///
/// The empty object serializes as `{}` and the empty array as `[]`; the same
/// bytes are hashed by the signer and written by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Body(Value);

impl Body {
    /// Empty JSON object (`{}`).
    pub fn empty() -> Self {
        Body(Value::Object(Map::new()))
    }

    /// Wraps an arbitrary JSON value, rejecting scalars.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) | Value::Array(_) => Some(Body(value)),
            _ => None,
        }
    }

    /// Borrowed JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Compact JSON serialization.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

impl From<Map<String, Value>> for Body {
    fn from(map: Map<String, Value>) -> Self {
        Body(Value::Object(map))
    }
}

impl From<Vec<Value>> for Body {
    fn from(items: Vec<Value>) -> Self {
        Body(Value::Array(items))
    }
}

/// Immutable descriptor of one outbound call.
///
/// Only the header set can change after construction, and only through
/// [`Request::set_header`]. Header names are stored lower-cased and are
/// therefore unique regardless of the case callers used.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    endpoint: String,
    issued_at: DateTime<Utc>,
    method: Method,
    path: String,
    body: Body,
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
}

impl Request {
    /// Starts a request against `endpoint` (scheme + host, no trailing path).
    pub fn builder(
        endpoint: impl Into<String>,
        method: Method,
        path: impl Into<String>,
    ) -> RequestBuilder {
        RequestBuilder {
            endpoint: endpoint.into(),
            issued_at: None,
            method,
            path: path.into(),
            body: Body::empty(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
        }
    }

    /// Base URI, e.g. `https://sellingpartnerapi-eu.amazon.com`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Signing timestamp.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// HTTP verb.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Unencoded request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// JSON body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Serialized body bytes, identical for signing and sending.
    pub fn body_bytes(&self) -> Vec<u8> {
        self.body.to_json().into_bytes()
    }

    /// Header map with lower-case names.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Query parameters.
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Sets a header; the name is lower-cased and both parts are trimmed.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    /// Host part of the endpoint, without scheme or trailing slash.
    pub fn host(&self) -> &str {
        host_of(&self.endpoint)
    }

    /// Endpoint + percent-encoded path.
    pub fn uri(&self) -> String {
        let path = self
            .path
            .split('/')
            .map(encode_component)
            .collect::<Vec<_>>()
            .join("/");
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }

    /// Endpoint + path + canonical query; the query is encoded exactly as signed.
    pub fn full_uri(&self) -> String {
        let query = canonical_query_string(&self.query);
        if query.is_empty() {
            self.uri()
        } else {
            format!("{}?{}", self.uri(), query)
        }
    }
}

/// Strips the scheme and any trailing path from an endpoint.
pub(crate) fn host_of(endpoint: &str) -> &str {
    let without_scheme = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: String,
    issued_at: Option<DateTime<Utc>>,
    method: Method,
    path: String,
    body: Body,
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
}

impl RequestBuilder {
    /// Signing timestamp (defaults to now).
    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    /// JSON body (defaults to `{}`).
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a header; later values for the same name win.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        self
    }

    /// Adds several headers.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            self = self.header(name.as_ref(), value.as_ref());
        }
        self
    }

    /// Adds a query parameter; later values for the same key win.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds several query parameters.
    pub fn queries<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.query.insert(key.into(), value.into());
        }
        self
    }

    /// Freezes the request.
    pub fn build(self) -> Request {
        Request {
            endpoint: self.endpoint,
            issued_at: self.issued_at.unwrap_or_else(Utc::now),
            method: self.method,
            path: self.path,
            body: self.body,
            headers: self.headers,
            query: self.query,
        }
    }
}
