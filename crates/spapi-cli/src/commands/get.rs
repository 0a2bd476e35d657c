//! Get command implementation.

use spapi_client::{ClientConfig, Credentials, ReqwestTransport, SpApiClient};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::output;

pub fn run(
    path: String,
    config: String,
    query: Vec<(String, String)>,
    access_key: String,
    access_secret: String,
    timeout: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_json_file(&config)?;
    let transport = ReqwestTransport::new(Duration::from_secs(timeout))?;
    let mut client = SpApiClient::new(
        config,
        Credentials::new(access_key, access_secret),
        transport,
    )?;

    let query: BTreeMap<String, String> = query.into_iter().collect();
    let response = client.get(&path, &query)?;
    println!("{}", output::format_json(response.payload()?));
    Ok(())
}
