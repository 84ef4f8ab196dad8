//! Result export as CSV or JSON

use crate::core::batch::AddressResult;
use crate::utils::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported export encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(BatchError::validation(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }
}

const CSV_HEADER: &str = "address,status,error,payload,processed_at";

/// Encode result rows in `format`, preserving their order
pub fn render_results(format: ExportFormat, rows: &[AddressResult]) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        ExportFormat::Csv => {
            let mut out = String::from(CSV_HEADER);
            out.push_str("\r\n");
            for row in rows {
                let payload = match &row.payload {
                    Some(payload) => serde_json::to_string(payload)?,
                    None => String::new(),
                };
                let processed_at = row
                    .processed_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default();
                let fields = [
                    row.address.as_str(),
                    row.status.as_str(),
                    row.error_message.as_deref().unwrap_or(""),
                    payload.as_str(),
                    processed_at.as_str(),
                ];
                let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
                out.push_str(&line.join(","));
                out.push_str("\r\n");
            }
            Ok(out)
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
