//! CSV ingest and normalization.
//!
//! Turns raw delimited text into records keyed by canonical column names.
//! The same algorithm serves both input files; only the required-column list
//! differs (`CsvSchema`).
//!
//! Rules:
//! - header names resolve to canonical columns by case-insensitive exact match
//! - any row-level syntax error fails the whole file (all messages are kept)
//! - a required column absent from the header fails the whole file, but only
//!   when there is at least one data row
//! - extra columns are dropped, row order is preserved
//! - no value coercion happens here (see `metrics::parse`)

use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ContractTerms, DeliveryRecord};
use crate::error::NormalizeError;

/// Fixed set of canonical columns an input file must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSchema {
    /// Label used in error messages.
    pub label: &'static str,
    pub required: &'static [&'static str],
}

pub const CONTRACT_TERMS_SCHEMA: CsvSchema = CsvSchema {
    label: "contract terms",
    required: &["Name", "Start Date", "End Date", "Budget", "CPM", "Impressions Goal"],
};

pub const DELIVERY_SCHEMA: CsvSchema = CsvSchema {
    label: "delivery data",
    required: &["DATE", "CAMPAIGN ORDER NAME", "IMPRESSIONS", "SPEND"],
};

/// One data row reduced to the schema's canonical columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    columns: &'static [&'static str],
    values: Vec<String>,
}

impl NormalizedRow {
    /// Cell text for a canonical column (empty when the column is not in the schema).
    pub fn get(&self, column: &str) -> &str {
        self.columns
            .iter()
            .position(|c| *c == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A typed record built from one normalized row.
pub trait CsvRecord: Sized {
    const SCHEMA: CsvSchema;

    fn from_row(row: &NormalizedRow) -> Self;
}

impl CsvRecord for ContractTerms {
    const SCHEMA: CsvSchema = CONTRACT_TERMS_SCHEMA;

    fn from_row(row: &NormalizedRow) -> Self {
        ContractTerms {
            name: row.get("Name").to_string(),
            start_date: row.get("Start Date").to_string(),
            end_date: row.get("End Date").to_string(),
            budget: row.get("Budget").to_string(),
            cpm: row.get("CPM").to_string(),
            impressions_goal: row.get("Impressions Goal").to_string(),
        }
    }
}

impl CsvRecord for DeliveryRecord {
    const SCHEMA: CsvSchema = DELIVERY_SCHEMA;

    fn from_row(row: &NormalizedRow) -> Self {
        DeliveryRecord {
            date: row.get("DATE").to_string(),
            campaign_name: row.get("CAMPAIGN ORDER NAME").to_string(),
            impressions: row.get("IMPRESSIONS").to_string(),
            spend: row.get("SPEND").to_string(),
        }
    }
}

/// Normalize raw CSV text against `schema`.
pub fn normalize_csv(text: &str, schema: &CsvSchema) -> Result<Vec<NormalizedRow>, NormalizeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| NormalizeError::CsvSyntax {
            schema: schema.label,
            messages: vec![e.to_string()],
        })?
        .clone();

    let mut records = Vec::new();
    let mut messages = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => messages.push(e.to_string()),
        }
    }

    if !messages.is_empty() {
        return Err(NormalizeError::CsvSyntax {
            schema: schema.label,
            messages,
        });
    }

    if records.is_empty() {
        debug!(schema = schema.label, "no data rows");
        return Ok(Vec::new());
    }

    let column_map = resolve_columns(&headers, schema)?;
    debug!(schema = schema.label, ?column_map, "resolved columns");

    Ok(records
        .iter()
        .map(|record| NormalizedRow {
            columns: schema.required,
            values: column_map
                .iter()
                .map(|&idx| record.get(idx).unwrap_or("").to_string())
                .collect(),
        })
        .collect())
}

/// Parse CSV text straight into typed records.
pub fn parse_records<T: CsvRecord>(text: &str) -> Result<Vec<T>, NormalizeError> {
    let rows = normalize_csv(text, &T::SCHEMA)?;
    Ok(rows.iter().map(T::from_row).collect())
}

/// Read a CSV file and parse it into typed records.
pub fn load_records<T: CsvRecord>(path: &Path) -> Result<Vec<T>, NormalizeError> {
    let text = std::fs::read_to_string(path).map_err(|source| NormalizeError::Io {
        schema: T::SCHEMA.label,
        path: path.display().to_string(),
        source,
    })?;
    let records = parse_records::<T>(&text)?;
    info!(
        schema = T::SCHEMA.label,
        path = %path.display(),
        rows = records.len(),
        "loaded CSV"
    );
    Ok(records)
}

pub fn parse_contract_terms(text: &str) -> Result<Vec<ContractTerms>, NormalizeError> {
    parse_records(text)
}

pub fn parse_delivery_data(text: &str) -> Result<Vec<DeliveryRecord>, NormalizeError> {
    parse_records(text)
}

/// Map each required canonical column to its index in the actual header row.
///
/// The returned vector is in `schema.required` order.
fn resolve_columns(headers: &StringRecord, schema: &CsvSchema) -> Result<Vec<usize>, NormalizeError> {
    let actual: Vec<String> = headers.iter().map(normalize_header_name).collect();

    let mut indices = Vec::with_capacity(schema.required.len());
    let mut missing = Vec::new();
    for required in schema.required {
        let wanted = required.to_lowercase();
        match actual.iter().position(|h| h.to_lowercase() == wanted) {
            Some(idx) => indices.push(idx),
            None => missing.push((*required).to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(NormalizeError::MissingColumns {
            schema: schema.label,
            missing,
            available: actual,
        });
    }
    Ok(indices)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim_start_matches('\u{feff}').to_string()
}
