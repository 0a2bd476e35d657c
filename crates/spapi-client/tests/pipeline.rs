//! Client pipeline against a scripted transport.

use chrono::{TimeZone, Utc};
use serde_json::json;
use spapi_client::{
    AppInfo, Body, ClientConfig, ClientError, ConfigError, Credentials, FixedClock, RawResponse,
    Request, SigV4Signer, SpApiClient, Transport, TransportError,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;

#[derive(Default)]
struct ScriptedTransport {
    responses: RefCell<VecDeque<RawResponse>>,
    sent: RefCell<Vec<(String, Vec<u8>)>>,
}

impl ScriptedTransport {
    fn answering(status: u16, body: &str) -> Self {
        let transport = Self::default();
        transport.push(status, body);
        transport
    }

    fn push(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(RawResponse {
            status,
            reason: if status < 400 { "OK" } else { "Bad Request" }.to_string(),
            headers: BTreeMap::new(),
            body: body.as_bytes().to_vec(),
        });
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
        self.sent
            .borrow_mut()
            .push((request.full_uri(), request.body_bytes()));
        Ok(self.responses.borrow_mut().pop_front().unwrap_or_default())
    }
}

fn config() -> ClientConfig {
    let mut config = ClientConfig::new(
        "https://sellingpartnerapi-eu.amazon.com",
        AppInfo::new("sync", "1.0", "Rust", "1.75", "linux"),
    );
    config.marketplace_id = Some("A1PA6795UKMFR9".to_string());
    config
}

fn client(transport: &ScriptedTransport) -> SpApiClient<&ScriptedTransport> {
    SpApiClient::new(config(), Credentials::new("AKIDEXAMPLE", "secret"), transport)
        .unwrap()
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
}

#[test]
fn base_headers_and_query_are_applied_then_signed() {
    let transport = ScriptedTransport::answering(200, r#"{"payload":{"Orders":[]}}"#);
    let mut client = client(&transport);

    let query = BTreeMap::from([("CreatedAfter".to_string(), "2024-05-01T00:00:00Z".to_string())]);
    let response = client.get("/orders/v0/orders", &query).unwrap();
    assert_eq!(response.payload().unwrap(), &json!({"Orders": []}));

    let request = client.last_request().unwrap();
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("host"), Some("sellingpartnerapi-eu.amazon.com"));
    assert_eq!(request.header("x-amz-date"), Some("20240501T120000Z"));
    assert_eq!(
        request.header("user-agent"),
        Some("sync/1.0 (Language=Rust/1.75;Platform=linux)")
    );
    assert_eq!(request.header("x-amz-access-token"), None);
    assert_eq!(request.query().get("marketplaceIds").map(String::as_str), Some("A1PA6795UKMFR9"));

    let authorization = request.header("authorization").unwrap();
    assert!(authorization.starts_with(
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/eu-west-1/execute-api/aws4_request, \
         SignedHeaders=accept;content-type;host;user-agent;x-amz-date, Signature="
    ));
    assert_eq!(
        authorization,
        SigV4Signer::new().authorization(request, &Credentials::new("AKIDEXAMPLE", "secret"))
    );

    let sent = transport.sent.borrow();
    assert_eq!(
        sent[0].0,
        "https://sellingpartnerapi-eu.amazon.com/orders/v0/orders\
         ?CreatedAfter=2024-05-01T00%3A00%3A00Z&marketplaceIds=A1PA6795UKMFR9"
    );
    assert_eq!(sent[0].1, b"{}".to_vec());
}

#[test]
fn caller_values_override_defaults_and_beta_is_appended() {
    let transport = ScriptedTransport::answering(200, "{}");
    let mut cfg = config();
    cfg.beta = true;
    let mut client = SpApiClient::new(cfg, Credentials::new("AK", "SK"), &transport).unwrap();
    client.set_restricted_data_token(Some("Atza|rdt".to_string()));

    let headers = BTreeMap::from([(" Accept ".to_string(), " text/plain ".to_string())]);
    let query = BTreeMap::from([("marketplaceIds".to_string(), "ATVPDKIKX0DER".to_string())]);
    client
        .request(spapi_client::Method::Get, "/x", Body::empty(), &headers, &query)
        .unwrap();

    let request = client.last_request().unwrap();
    assert_eq!(request.header("accept"), Some("text/plain"));
    assert_eq!(request.header("x-amz-access-token"), Some("Atza|rdt"));
    assert_eq!(request.query().get("marketplaceIds").map(String::as_str), Some("ATVPDKIKX0DER"));
    assert_eq!(request.query().get("version").map(String::as_str), Some("beta"));
    assert!(request
        .header("authorization")
        .unwrap()
        .contains("x-amz-access-token"));
}

#[test]
fn post_body_is_sent_as_signed() {
    let transport = ScriptedTransport::answering(202, r#"{"feedDocumentId":"doc-1"}"#);
    let mut client = client(&transport);
    let body = Body::from_value(json!({"contentType": "text/xml", "a": [1, 2]})).unwrap();

    let response = client.post("/feeds/2021-06-30/documents", body).unwrap();
    assert_eq!(response.payload().unwrap()["feedDocumentId"], "doc-1");
    assert_eq!(
        transport.sent.borrow()[0].1,
        br#"{"contentType":"text/xml","a":[1,2]}"#.to_vec()
    );
}

#[test]
fn failure_status_carries_decoded_errors() {
    let transport = ScriptedTransport::answering(
        400,
        r#"{"errors":[{"code":"InvalidInput","message":"Invalid MarketplaceId"}]}"#,
    );
    let mut client = client(&transport);

    match client.delete("/listings/2021-08-01/items/S/SKU", &BTreeMap::new()) {
        Err(ClientError::Api { status, reason, errors }) => {
            assert_eq!(status, 400);
            assert_eq!(reason, "Bad Request");
            assert_eq!(errors[0].code, "InvalidInput");
        }
        other => panic!("unexpected {:?}", other.map(|r| r.status())),
    }
    assert!(client.last_request().is_some());
}

#[test]
fn missing_app_info_fails_before_any_request() {
    let transport = ScriptedTransport::default();
    let config = ClientConfig::new("https://sellingpartnerapi-na.amazon.com", AppInfo::default());
    match SpApiClient::new(config, Credentials::new("AK", "SK"), &transport) {
        Err(ClientError::Configuration(ConfigError::MissingAppInfo(fields))) => {
            assert_eq!(fields.len(), 5)
        }
        _ => panic!("expected configuration error"),
    }
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"endpoint":"https://sellingpartnerapi-fe.amazon.com",
            "app_info":{{"name":"n","version":"v","language":"Rust","language_version":"1","platform":"p"}},
            "beta":true}}"#
    )
    .unwrap();

    let config = ClientConfig::from_json_file(file.path()).unwrap();
    assert!(config.beta);
    assert!(config.validate().is_ok());

    assert!(matches!(
        ClientConfig::from_json_file(file.path().with_extension("missing")),
        Err(ConfigError::Read { .. })
    ));
}
