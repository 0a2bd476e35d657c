//! Sign command implementation.

use chrono::{DateTime, Utc};
use serde_json::json;
use spapi_client::{Body, Credentials, Method, Request, RequestSigner, SigV4Signer};

use crate::input;

pub struct SignArgs {
    pub endpoint: String,
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub date: Option<String>,
    pub access_key: String,
    pub access_secret: String,
    pub canonical: bool,
    pub json: bool,
}

pub fn run(args: SignArgs) -> Result<(), Box<dyn std::error::Error>> {
    let method =
        Method::parse(&args.method).ok_or_else(|| format!("Unsupported method: {}", args.method))?;
    let issued_at = match &args.date {
        Some(date) => DateTime::parse_from_rfc3339(date)
            .map_err(|e| format!("Invalid --date {}: {}", date, e))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let body = match &args.body {
        Some(path) => Body::from_value(input::read_json(Some(path))?)
            .ok_or("Body must be a JSON object or array")?,
        None => Body::empty(),
    };

    let mut builder = Request::builder(&args.endpoint, method, &args.path)
        .issued_at(issued_at)
        .body(body)
        .queries(args.query);
    let draft = builder.clone().build();
    builder = builder
        .header("host", draft.host())
        .header("x-amz-date", &issued_at.format("%Y%m%dT%H%M%SZ").to_string())
        .headers(args.headers);
    let mut request = builder.build();

    let signer = SigV4Signer::new();
    let credentials = Credentials::new(args.access_key, args.access_secret);
    let canonical_request = signer.canonical_request(&request);
    signer.sign(&mut request, &credentials);
    let authorization = request.header("authorization").unwrap_or_default();

    if args.json {
        let mut out = json!({
            "authorization": authorization,
            "x-amz-date": request.header("x-amz-date"),
            "region": signer.region(&request),
            "uri": request.full_uri(),
        });
        if args.canonical {
            out["canonical_request"] = json!(canonical_request);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        if args.canonical {
            println!("{}\n", canonical_request);
        }
        println!("Authorization: {}", authorization);
    }
    Ok(())
}
