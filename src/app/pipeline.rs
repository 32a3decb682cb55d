//! Shared "report pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! read both CSVs (concurrently) -> normalize -> process every campaign
//!
//! Front-ends then only deal with presentation.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{ContractTerms, DeliveryRecord, ProcessingOutcome, ReportConfig};
use crate::error::{AppError, EXIT_NO_CAMPAIGNS};
use crate::io::ingest::load_records;
use crate::metrics::process_all;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub as_of: NaiveDate,
    pub contract_rows: usize,
    pub delivery_rows: usize,
    pub outcome: ProcessingOutcome,
}

/// Read and normalize both input files.
///
/// The reads are independent, so they run side by side; either failure
/// aborts the run.
pub fn load_inputs(config: &ReportConfig) -> Result<(Vec<ContractTerms>, Vec<DeliveryRecord>), AppError> {
    let (contracts, deliveries) = rayon::join(
        || load_records::<ContractTerms>(&config.contracts_path),
        || load_records::<DeliveryRecord>(&config.delivery_path),
    );
    Ok((contracts?, deliveries?))
}

/// Execute the full pipeline from the configured files.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    let (contracts, deliveries) = load_inputs(config)?;
    run_with_inputs(&contracts, &deliveries, config.as_of)
}

/// Execute the pipeline on already-normalized records.
pub fn run_with_inputs(
    contracts: &[ContractTerms],
    deliveries: &[DeliveryRecord],
    as_of: NaiveDate,
) -> Result<RunOutput, AppError> {
    let outcome = process_all(contracts, deliveries, as_of);

    if outcome.campaigns.is_empty() {
        return Err(AppError::new(
            EXIT_NO_CAMPAIGNS,
            format!(
                "No campaigns could be processed ({} contract rows, {} skipped). Please check your data format and try again.",
                contracts.len(),
                outcome.skipped.len()
            ),
        ));
    }

    info!(
        as_of = %as_of,
        delivery_rows = deliveries.len(),
        "{}",
        outcome.summary_line()
    );

    Ok(RunOutput {
        as_of,
        contract_rows: contracts.len(),
        delivery_rows: deliveries.len(),
        outcome,
    })
}
