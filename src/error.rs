//! Error types.
//!
//! Two layers:
//!
//! - typed pipeline errors (`NormalizeError`, `ContractError`) returned by the
//!   library so callers can match on the failure kind
//! - `AppError`, the user-facing error carried out of the binary together with
//!   the process exit code

use thiserror::Error;

/// Exit code for unreadable or malformed input.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when input was readable but no campaign survived processing.
pub const EXIT_NO_CAMPAIGNS: u8 = 3;
/// Exit code for report/export output failures.
pub const EXIT_OUTPUT: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Whole-file failure while turning raw CSV text into canonical records.
///
/// Any of these aborts the run for that file; no partial result is produced.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to read {schema} CSV '{path}': {source}")]
    Io {
        schema: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{schema} CSV parsing errors: {}", messages.join(", "))]
    CsvSyntax {
        schema: &'static str,
        messages: Vec<String>,
    },

    #[error(
        "{schema} CSV is missing required columns: {}. Available columns: {}",
        missing.join(", "),
        available.join(", ")
    )]
    MissingColumns {
        schema: &'static str,
        missing: Vec<String>,
        available: Vec<String>,
    },
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

/// Per-campaign validation failure. The campaign is skipped, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("`{field}` is not a number: '{raw}'")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("`{field}` must not be negative: '{raw}'")]
    Negative { field: &'static str, raw: String },

    #[error("`{field}` is not a valid date: '{raw}'")]
    InvalidDate { field: &'static str, raw: String },

    #[error("`End Date` {end} is before `Start Date` {start}")]
    InvertedRange { start: String, end: String },

    #[error("duplicate campaign name (an earlier row with this `Name` was already processed)")]
    DuplicateName,
}

impl ContractError {
    /// Name of the contract-terms column the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ContractError::InvalidNumber { field, .. }
            | ContractError::Negative { field, .. }
            | ContractError::InvalidDate { field, .. } => field,
            ContractError::InvertedRange { .. } => "End Date",
            ContractError::DuplicateName => "Name",
        }
    }
}
