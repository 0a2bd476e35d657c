//! Inbound response accessor.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::collections::BTreeMap;

use crate::error::{ApiError, ClientError};
use crate::transport::RawResponse;

/// Status, headers and a lazily decoded JSON document.
///
/// The body is decoded at most once; later calls reuse the cached value. A
/// zero-length body decodes to an empty object, any other non-JSON body is a
/// [`ClientError::MalformedResponse`].
#[derive(Debug)]
pub struct Response {
    status: u16,
    reason: String,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
    decoded: OnceCell<Value>,
}

impl Response {
    /// Wraps a transport result.
    pub fn new(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            reason: raw.reason,
            headers: raw
                .headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
            body: raw.body,
            decoded: OnceCell::new(),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// `true` for status codes below 300.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body bytes.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Whole decoded document.
    pub fn json(&self) -> Result<&Value, ClientError> {
        if let Some(value) = self.decoded.get() {
            return Ok(value);
        }
        let value = if self.body.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&self.body).map_err(|source| ClientError::MalformedResponse {
                body: String::from_utf8_lossy(&self.body).into_owned(),
                source,
            })?
        };
        Ok(self.decoded.get_or_init(|| value))
    }

    /// The `payload` member when present, otherwise the whole document.
    pub fn payload(&self) -> Result<&Value, ClientError> {
        let document = self.json()?;
        Ok(document.get("payload").unwrap_or(document))
    }

    /// Payload decoded into `T`.
    pub fn deserialize_payload<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let payload = self.payload()?;
        T::deserialize(payload).map_err(|source| ClientError::MalformedResponse {
            body: payload.to_string(),
            source,
        })
    }

    /// Decoded `errors` list; empty when absent or not an error array.
    pub fn errors(&self) -> Result<Vec<ApiError>, ClientError> {
        let document = self.json()?;
        Ok(document
            .get("errors")
            .and_then(|errors| Vec::<ApiError>::deserialize(errors).ok())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            reason: "OK".to_string(),
            headers: BTreeMap::from([("X-Amzn-RequestId".to_string(), "req-1".to_string())]),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn payload_member_is_unwrapped() {
        let response = Response::new(raw(200, r#"{"payload":{"Orders":[]}}"#));
        assert!(response.is_success());
        assert_eq!(response.payload().unwrap(), &json!({"Orders": []}));
        assert_eq!(response.header("x-amzn-requestid"), Some("req-1"));
    }

    #[test]
    fn document_without_payload_is_returned_whole() {
        let response = Response::new(raw(200, r#"{"reportDocumentId":"doc-1"}"#));
        assert_eq!(response.payload().unwrap()["reportDocumentId"], "doc-1");
    }

    #[test]
    fn decoding_is_cached() {
        let response = Response::new(raw(200, r#"{"a":1}"#));
        let first = response.json().unwrap() as *const Value;
        let second = response.json().unwrap() as *const Value;
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_json_is_an_error_not_empty() {
        let response = Response::new(raw(200, "<html>gateway</html>"));
        match response.payload() {
            Err(ClientError::MalformedResponse { body, .. }) => {
                assert_eq!(body, "<html>gateway</html>")
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn empty_body_is_empty_object() {
        let response = Response::new(raw(204, ""));
        assert_eq!(response.json().unwrap(), &json!({}));
        assert!(response.errors().unwrap().is_empty());
    }

    #[test]
    fn errors_are_decoded() {
        let response = Response::new(raw(
            400,
            r#"{"errors":[{"code":"InvalidInput","message":"bad","details":"x"}]}"#,
        ));
        assert!(!response.is_success());
        let errors = response.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "InvalidInput");
        assert_eq!(errors[0].details.as_deref(), Some("x"));
    }

    #[test]
    fn typed_payload() {
        #[derive(serde::Deserialize)]
        struct Participations {
            count: u32,
        }
        let response = Response::new(raw(200, r#"{"payload":{"count":3}}"#));
        let typed: Participations = response.deserialize_payload().unwrap();
        assert_eq!(typed.count, 3);
    }
}
