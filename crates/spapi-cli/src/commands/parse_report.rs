//! Parse-report command implementation.

use spapi_client::{parse_report, ReportType};

use crate::input;

pub fn run(input: Option<String>, report_type: String) -> Result<(), Box<dyn std::error::Error>> {
    let content = input::read_text(input.as_deref())?;
    let records = parse_report(&content, &ReportType::new(report_type))?;
    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}
