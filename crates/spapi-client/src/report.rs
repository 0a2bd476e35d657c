//! Report documents: metadata and flat-file parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spapi_canonical::Record;
use std::fmt;
use thiserror::Error;

/// Report flat-file parsing failures.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The document has no header row.
    #[error("report has no header row")]
    MissingHeader,
    /// A data row has a different number of columns than the header.
    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        /// 1-based data row number.
        row: usize,
        /// Header column count.
        expected: usize,
        /// Row column count.
        found: usize,
    },
    /// The underlying reader rejected the input.
    #[error("malformed report: {0}")]
    Csv(#[from] csv::Error),
}

/// Report type identifier, e.g. `GET_FLAT_FILE_OPEN_LISTINGS_DATA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportType(String);

impl ReportType {
    /// Tab-separated listings report.
    pub const MERCHANT_LISTINGS_ALL_DATA: &'static str = "GET_MERCHANT_LISTINGS_ALL_DATA";

    /// Wraps a report type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Report type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Column delimiter of the report's flat file.
    pub fn delimiter(&self) -> u8 {
        if self.0 == Self::MERCHANT_LISTINGS_ALL_DATA {
            b'\t'
        } else {
            b','
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Get-report-document payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    /// Document identifier.
    pub report_document_id: String,
    /// Pre-signed download URL.
    pub url: String,
    /// `GZIP` when the download is compressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_algorithm: Option<String>,
}

/// Parses a downloaded flat file into records keyed by header.
///
/// Blank lines are skipped. Header names have `-` replaced with `_`.
pub fn parse_report(content: &str, report_type: &ReportType) -> Result<Vec<Record>, ReportError> {
    let delimiter = report_type.delimiter();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        // Tab-separated listings contain bare quotes inside titles.
        .quoting(delimiter != b'\t')
        .from_reader(content.as_bytes());

    let mut rows = reader.records().filter(|row| match row {
        Ok(row) => !(row.len() == 1 && row[0].trim().is_empty()) && !row.is_empty(),
        Err(_) => true,
    });

    let header: Vec<String> = match rows.next() {
        Some(row) => row?.iter().map(|name| name.trim().replace('-', "_")).collect(),
        None => return Err(ReportError::MissingHeader),
    };

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        let row = row?;
        if row.len() != header.len() {
            return Err(ReportError::ColumnCount {
                row: idx + 1,
                expected: header.len(),
                found: row.len(),
            });
        }
        let record: Record = header
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), Value::String(value.to_string())))
            .collect();
        records.push(record);
    }
    Ok(records)
}
