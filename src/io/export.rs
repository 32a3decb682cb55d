//! Export the processed campaigns to JSON.
//!
//! This is the hand-off format for a renderer: ratios stay fractional
//! (`1.0` = 100%), dates are `YYYY-MM-DD`, counts are plain numbers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ProcessedCampaign, ProcessingOutcome, SkippedCampaign};
use crate::error::{AppError, EXIT_OUTPUT};

#[derive(Debug, Serialize)]
pub struct ExportFile<'a> {
    pub tool: &'static str,
    pub as_of: NaiveDate,
    pub processed: usize,
    pub total: usize,
    pub campaigns: &'a [ProcessedCampaign],
    pub skipped: &'a [SkippedCampaign],
}

impl<'a> ExportFile<'a> {
    pub fn new(outcome: &'a ProcessingOutcome, as_of: NaiveDate) -> Self {
        Self {
            tool: "pacing",
            as_of,
            processed: outcome.campaigns.len(),
            total: outcome.total(),
            campaigns: &outcome.campaigns,
            skipped: &outcome.skipped,
        }
    }
}

/// Write the export to `path`, or to stdout when `path` is `-`.
pub fn write_json(path: &Path, outcome: &ProcessingOutcome, as_of: NaiveDate) -> Result<(), AppError> {
    let export = ExportFile::new(outcome, as_of);

    if path.as_os_str() == "-" {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write_to(&mut handle, &export)?;
        writeln!(handle).map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write JSON: {e}")))?;
        return Ok(());
    }

    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_OUTPUT,
            format!("Failed to create JSON export '{}': {e}", path.display()),
        )
    })?;
    write_to(&mut file, &export)
}

fn write_to<W: Write>(writer: &mut W, export: &ExportFile<'_>) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, export)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write JSON: {e}")))
}
