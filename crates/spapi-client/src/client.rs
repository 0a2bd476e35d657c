//! Configured SP-API client: header/query defaults, signing and dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::error::{ClientError, ConfigError};
use crate::request::{Body, Method, Request};
use crate::response::Response;
use crate::signing::{RequestSigner, SigV4Signer};
use crate::transport::Transport;

/// Application identity sent in the `user-agent` header.
///
/// Every field is optional at parse time so a config file can be read and
/// then rejected with the full list of missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Application name.
    pub name: Option<String>,
    /// Application version.
    pub version: Option<String>,
    /// Implementation language.
    pub language: Option<String>,
    /// Language version.
    pub language_version: Option<String>,
    /// Host platform.
    pub platform: Option<String>,
}

impl AppInfo {
    /// Fully populated identity.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        language: impl Into<String>,
        language_version: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            language: Some(language.into()),
            language_version: Some(language_version.into()),
            platform: Some(platform.into()),
        }
    }

    /// Rejects identities with absent or blank fields, naming all of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("name", &self.name),
            ("version", &self.version),
            ("language", &self.language),
            ("language_version", &self.language_version),
            ("platform", &self.platform),
        ];
        let missing: Vec<String> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(field, _)| field.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingAppInfo(missing))
        }
    }

    /// `name/version (Language=language/language_version;Platform=platform)`.
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} (Language={}/{};Platform={})",
            self.name.as_deref().unwrap_or_default(),
            self.version.as_deref().unwrap_or_default(),
            self.language.as_deref().unwrap_or_default(),
            self.language_version.as_deref().unwrap_or_default(),
            self.platform.as_deref().unwrap_or_default(),
        )
    }
}

/// Client settings; credentials are supplied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URI, e.g. `https://sellingpartnerapi-eu.amazon.com`.
    pub endpoint: String,
    /// Application identity.
    #[serde(default)]
    pub app_info: AppInfo,
    /// Default `marketplaceIds` query value.
    #[serde(default)]
    pub marketplace_id: Option<String>,
    /// Restricted data token sent as `x-amz-access-token`.
    #[serde(default)]
    pub restricted_data_token: Option<String>,
    /// Adds `version=beta` to every query.
    #[serde(default)]
    pub beta: bool,
}

impl ClientConfig {
    /// Minimal config for `endpoint`.
    pub fn new(endpoint: impl Into<String>, app_info: AppInfo) -> Self {
        Self {
            endpoint: endpoint.into(),
            app_info,
            ..Self::default()
        }
    }

    /// Reads a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks the endpoint scheme and the app identity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        let has_host = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
            .map_or(false, |rest| !rest.trim_matches('/').is_empty());
        if !has_host {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        self.app_info.validate()
    }
}

/// Source of signing timestamps.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Signs and dispatches SP-API calls.
///
/// The client is not meant for concurrent use: `request` records the last
/// issued request, so it takes `&mut self`.
pub struct SpApiClient<T: Transport, S: RequestSigner = SigV4Signer> {
    config: ClientConfig,
    credentials: Credentials,
    transport: T,
    signer: S,
    clock: Box<dyn Clock + Send + Sync>,
    last_request: Option<Request>,
}

impl<T: Transport> SpApiClient<T, SigV4Signer> {
    /// Client with the SigV4 signer and the system clock.
    pub fn new(
        config: ClientConfig,
        credentials: Credentials,
        transport: T,
    ) -> Result<Self, ClientError> {
        Self::with_signer(config, credentials, transport, SigV4Signer::new())
    }
}

impl<T: Transport, S: RequestSigner> SpApiClient<T, S> {
    /// Client with a custom signer.
    pub fn with_signer(
        config: ClientConfig,
        credentials: Credentials,
        transport: T,
        signer: S,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            config,
            credentials,
            transport,
            signer,
            clock: Box::new(SystemClock),
            last_request: None,
        })
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Most recently issued request, signed, whether or not it succeeded.
    pub fn last_request(&self) -> Option<&Request> {
        self.last_request.as_ref()
    }

    /// Sets or clears the default marketplace.
    pub fn set_marketplace_id(&mut self, marketplace_id: Option<String>) -> &mut Self {
        self.config.marketplace_id = marketplace_id;
        self
    }

    /// Sets or clears the restricted data token.
    pub fn set_restricted_data_token(&mut self, token: Option<String>) -> &mut Self {
        self.config.restricted_data_token = token;
        self
    }

    /// Builds, signs and sends one call.
    pub fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Body,
        headers: &BTreeMap<String, String>,
        query: &BTreeMap<String, String>,
    ) -> Result<Response, ClientError> {
        let issued_at = self.clock.now();
        let mut request = Request::builder(&self.config.endpoint, method, path)
            .issued_at(issued_at)
            .body(body)
            .headers(self.base_headers(issued_at))
            .headers(headers)
            .queries(self.base_query(query))
            .build();

        self.signer.sign(&mut request, &self.credentials);
        let raw = self.transport.execute(&request);
        let uri = request.full_uri();
        let header_names: Vec<String> = request.headers().keys().cloned().collect();
        self.last_request = Some(request);

        let response = Response::new(raw?);
        if response.status() >= 400 {
            warn!(
                method = %method,
                uri = %uri,
                headers = ?header_names,
                status = response.status(),
                "request failed"
            );
            return Err(ClientError::Api {
                status: response.status(),
                reason: response.reason().to_string(),
                errors: response.errors().unwrap_or_default(),
            });
        }

        debug!(method = %method, uri = %uri, status = response.status(), "request completed");
        Ok(response)
    }

    /// `GET` with no body.
    pub fn get(
        &mut self,
        path: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Response, ClientError> {
        self.request(Method::Get, path, Body::empty(), &BTreeMap::new(), query)
    }

    /// `POST` with a JSON body.
    pub fn post(&mut self, path: &str, body: Body) -> Result<Response, ClientError> {
        self.request(Method::Post, path, body, &BTreeMap::new(), &BTreeMap::new())
    }

    /// `PUT` with a JSON body.
    pub fn put(&mut self, path: &str, body: Body) -> Result<Response, ClientError> {
        self.request(Method::Put, path, body, &BTreeMap::new(), &BTreeMap::new())
    }

    /// `PATCH` with a JSON body.
    pub fn patch(&mut self, path: &str, body: Body) -> Result<Response, ClientError> {
        self.request(Method::Patch, path, body, &BTreeMap::new(), &BTreeMap::new())
    }

    /// `DELETE` with no body.
    pub fn delete(
        &mut self,
        path: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Response, ClientError> {
        self.request(Method::Delete, path, Body::empty(), &BTreeMap::new(), query)
    }

    fn base_headers(&self, issued_at: DateTime<Utc>) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::from([
            ("accept".to_string(), "application/json".to_string()),
            ("content-type".to_string(), "application/json".to_string()),
            (
                "host".to_string(),
                crate::request::host_of(&self.config.endpoint).to_string(),
            ),
            ("user-agent".to_string(), self.config.app_info.user_agent()),
            (
                "x-amz-date".to_string(),
                issued_at.format("%Y%m%dT%H%M%SZ").to_string(),
            ),
        ]);
        if let Some(token) = &self.config.restricted_data_token {
            headers.insert("x-amz-access-token".to_string(), token.clone());
        }
        headers
    }

    fn base_query(&self, query: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        if let Some(marketplace_id) = &self.config.marketplace_id {
            merged.insert("marketplaceIds".to_string(), marketplace_id.clone());
        }
        merged.extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        if self.config.beta {
            merged.insert("version".to_string(), "beta".to_string());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_app_info_lists_every_field() {
        let info = AppInfo {
            name: Some("app".into()),
            version: Some(" ".into()),
            ..AppInfo::default()
        };
        match info.validate() {
            Err(ConfigError::MissingAppInfo(fields)) => assert_eq!(
                fields,
                vec!["version", "language", "language_version", "platform"]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn user_agent_format() {
        let info = AppInfo::new("sync", "1.2.0", "Rust", "1.75", "linux");
        assert_eq!(info.user_agent(), "sync/1.2.0 (Language=Rust/1.75;Platform=linux)");
    }

    #[test]
    fn endpoint_needs_scheme_and_host() {
        let info = AppInfo::new("a", "b", "c", "d", "e");
        assert!(ClientConfig::new("https://sellingpartnerapi-eu.amazon.com", info.clone())
            .validate()
            .is_ok());
        assert!(matches!(
            ClientConfig::new("sellingpartnerapi-eu.amazon.com", info.clone()).validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            ClientConfig::new("https://", info).validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn config_parses_with_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"endpoint":"https://sellingpartnerapi-na.amazon.com","app_info":{"name":"x"}}"#,
        )
        .unwrap();
        assert!(!config.beta);
        assert!(config.marketplace_id.is_none());
        assert!(config.validate().is_err());
    }
}
