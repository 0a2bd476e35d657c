//! Signatures checked against independently computed SigV4 vectors.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Map, Value};
use spapi_client::{Body, Credentials, Method, RegionTable, Request, RequestSigner, SigV4Signer};

const ACCESS_KEY: &str = "AKIDEXAMPLE";
const ACCESS_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new(ACCESS_KEY, ACCESS_SECRET)
}

fn orders_request() -> Request {
    Request::builder(
        "https://sellingpartnerapi-eu.amazon.com",
        Method::Get,
        "/orders/v0/orders",
    )
    .issued_at(issued_at())
    .header("host", "sellingpartnerapi-eu.amazon.com")
    .header("x-amz-date", "20240501T120000Z")
    .query("MarketplaceIds", "A1PA6795UKMFR9")
    .query("CreatedAfter", "2024-05-01T00:00:00Z")
    .build()
}

fn signed(mut request: Request) -> String {
    SigV4Signer::new().sign(&mut request, &credentials());
    request.header("authorization").unwrap().to_string()
}

#[test]
fn eu_orders_canonical_request() {
    let canonical = SigV4Signer::new().canonical_request(&orders_request());
    assert_eq!(
        canonical,
        "GET\n\
         /orders/v0/orders\n\
         CreatedAfter=2024-05-01T00%3A00%3A00Z&MarketplaceIds=A1PA6795UKMFR9\n\
         host:sellingpartnerapi-eu.amazon.com\n\
         x-amz-date:20240501T120000Z\n\
         \n\
         host;x-amz-date\n\
         44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    );
}

#[test]
fn eu_orders_string_to_sign() {
    let signer = SigV4Signer::new();
    let request = orders_request();
    let string_to_sign = signer.string_to_sign(
        &request,
        "3909e1caf0456e0da96224596ce532bc7dfe65c541200dd009f2179f2c470494",
    );
    assert_eq!(
        string_to_sign,
        "AWS4-HMAC-SHA256\n20240501T120000Z\n20240501/eu-west-1/execute-api/aws4_request\n\
         3909e1caf0456e0da96224596ce532bc7dfe65c541200dd009f2179f2c470494"
    );
}

#[test]
fn eu_orders_authorization() {
    assert_eq!(
        signed(orders_request()),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/eu-west-1/execute-api/aws4_request, \
         SignedHeaders=host;x-amz-date, \
         Signature=e57915a30dde897a4de1b7a43090679fd0693023c0984c7fb1ea0993e136cbf3"
    );
}

#[test]
fn access_token_header_is_signed() {
    let mut request = orders_request();
    request.set_header("x-amz-access-token", "Atza|token");
    assert_eq!(
        signed(request),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/eu-west-1/execute-api/aws4_request, \
         SignedHeaders=host;x-amz-access-token;x-amz-date, \
         Signature=031ae1c727feaca7d23a5b09c573696d9eaa4ad6dea4a5bd67bb550a8ad55734"
    );
}

#[test]
fn na_post_with_body() {
    let mut body = Map::new();
    body.insert(
        "contentType".to_string(),
        Value::String("text/tab-separated-values; charset=UTF-8".to_string()),
    );
    let request = Request::builder(
        "https://sellingpartnerapi-na.amazon.com",
        Method::Post,
        "/feeds/2021-06-30/documents",
    )
    .issued_at(issued_at())
    .header("host", "sellingpartnerapi-na.amazon.com")
    .header("x-amz-date", "20240501T120000Z")
    .header("content-type", "application/json")
    .body(body)
    .build();

    assert_eq!(
        signed(request),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/us-east-1/execute-api/aws4_request, \
         SignedHeaders=content-type;host;x-amz-date, \
         Signature=a663fdf57c3ddb70c4bf0abeb5de09e2c45bd713035473b04a6f013c0503c0b7"
    );
}

#[test]
fn unmapped_endpoint_falls_back_to_default_region() {
    let request = Request::builder(
        "https://api.example.test",
        Method::Get,
        "/sellers/v1/marketplaceParticipations",
    )
    .issued_at(issued_at())
    .header("host", "api.example.test")
    .header("x-amz-date", "20240501T120000Z")
    .build();

    assert_eq!(
        signed(request),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/eu-west-1/execute-api/aws4_request, \
         SignedHeaders=host;x-amz-date, \
         Signature=921ba32eb324f90eee511704e2097cbead0db89dd1e0868c2a9a1a2904232d47"
    );
}

#[test]
fn signing_twice_is_stable() {
    let first = signed(orders_request());
    let second = signed(orders_request());
    assert_eq!(first, second);

    let mut request = orders_request();
    let signer = SigV4Signer::new();
    signer.sign(&mut request, &credentials());
    signer.sign(&mut request, &credentials());
    assert_eq!(request.header("authorization"), Some(first.as_str()));
}

#[test]
fn header_added_before_signing_changes_signature() {
    let baseline = signed(orders_request());

    let mut with_extra = orders_request();
    with_extra.set_header("x-amzn-extra", "1");
    assert_ne!(signed(with_extra), baseline);
}

#[test]
fn header_added_after_signing_is_not_covered() {
    let signer = SigV4Signer::new();
    let mut request = orders_request();
    signer.sign(&mut request, &credentials());
    let before = request.header("authorization").unwrap().to_string();

    request.set_header("x-amzn-late", "1");
    assert_eq!(request.header("authorization"), Some(before.as_str()));
    assert!(!before.contains("x-amzn-late"));
}

#[test]
fn header_insertion_order_is_irrelevant() {
    let forward = Request::builder("https://sellingpartnerapi-fe.amazon.com", Method::Get, "/a")
        .issued_at(issued_at())
        .header("x-amz-date", "20240501T120000Z")
        .header("Host", "sellingpartnerapi-fe.amazon.com")
        .build();
    let reverse = Request::builder("https://sellingpartnerapi-fe.amazon.com", Method::Get, "/a")
        .issued_at(issued_at())
        .header("host", "sellingpartnerapi-fe.amazon.com")
        .header("X-Amz-Date", "20240501T120000Z")
        .build();
    assert_eq!(signed(forward), signed(reverse));
}

#[test]
fn empty_object_and_empty_array_bodies_hash_differently() {
    let object = Request::builder("https://sellingpartnerapi-na.amazon.com", Method::Put, "/x")
        .issued_at(issued_at())
        .body(Body::empty())
        .build();
    let array = Request::builder("https://sellingpartnerapi-na.amazon.com", Method::Put, "/x")
        .issued_at(issued_at())
        .body(Vec::<Value>::new())
        .build();
    let signer = SigV4Signer::new();
    assert!(signer.canonical_request(&object).ends_with(
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    ));
    assert!(signer.canonical_request(&array).ends_with(
        "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
    ));
}

#[test]
fn secret_never_appears_in_signed_output() {
    let signer = SigV4Signer::new();
    let mut request = orders_request();
    signer.sign(&mut request, &credentials());
    let canonical = signer.canonical_request(&request);
    assert!(!canonical.contains(ACCESS_SECRET));
    assert!(!request.header("authorization").unwrap().contains(ACCESS_SECRET));
    assert!(!format!("{:?}", credentials()).contains(ACCESS_SECRET));
}

#[test]
fn extended_region_table_is_used() {
    let signer = SigV4Signer::new().with_regions(
        RegionTable::default().with_entry("sellingpartnerapi-sandbox", "ap-southeast-2"),
    );
    let request = Request::builder(
        "https://sellingpartnerapi-sandbox.example.test",
        Method::Get,
        "/",
    )
    .issued_at(issued_at())
    .body(Body::from_value(json!({})).unwrap())
    .build();
    assert_eq!(
        signer.scope(&request),
        "20240501/ap-southeast-2/execute-api/aws4_request"
    );
}
