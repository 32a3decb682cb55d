//! `pacing-report` library crate.
//!
//! Reads a contract-terms CSV and a delivery-data CSV, joins them per
//! campaign and derives pacing metrics (expected vs. actual impressions,
//! catch-up rates).
//!
//! The binary (`pacing`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the processed campaign list can feed other front-ends unchanged

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod report;
