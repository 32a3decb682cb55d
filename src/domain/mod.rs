//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input records (`ContractTerms`, `DeliveryRecord`)
//! - derived outputs (`CampaignMetrics`, `ProcessedCampaign`, `ProcessingOutcome`)
//! - presentation knobs (`PacingStatus`, `SortField`, `ReportConfig`)

pub mod types;

pub use types::*;
