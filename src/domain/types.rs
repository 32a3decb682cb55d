//! Shared domain types.
//!
//! Input records keep the raw cell text exactly as it appeared in the CSV;
//! numeric and date coercion happens in `metrics`, where a bad value only costs
//! the one campaign it belongs to. Everything here is serializable so the
//! processed list can be handed to a renderer or exported as JSON unchanged.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One row of the contract-terms CSV, keyed by canonical column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "CPM")]
    pub cpm: String,
    #[serde(rename = "Impressions Goal")]
    pub impressions_goal: String,
}

/// One row of the delivery-data CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    #[serde(rename = "DATE")]
    pub date: String,
    #[serde(rename = "CAMPAIGN ORDER NAME")]
    pub campaign_name: String,
    #[serde(rename = "IMPRESSIONS")]
    pub impressions: String,
    /// Carried through for display; not used by any pacing metric.
    #[serde(rename = "SPEND")]
    pub spend: String,
}

/// Pacing metrics for one campaign as of a given calendar day.
///
/// Ratios (`current_pacing`, `yesterday_vs_needed`) are fractions, `1.0` = 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub campaign_name: String,
    pub budget: f64,
    pub cpm: f64,
    pub impression_goal: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub as_of: NaiveDate,

    /// Inclusive length of the flight, always `>= 1`.
    pub total_campaign_days: i64,
    /// Clamped to `[0, total_campaign_days]`.
    pub days_into_campaign: i64,
    pub days_until_end: i64,

    pub expected_impressions: f64,
    pub actual_impressions: i64,
    pub current_pacing: f64,
    pub remaining_impressions: u64,
    pub remaining_average_needed: f64,

    /// Impressions on the most recent delivery day on file.
    pub yesterday_impressions: i64,
    pub yesterday_vs_needed: f64,
}

impl CampaignMetrics {
    pub fn pacing_status(&self) -> PacingStatus {
        PacingStatus::from_ratio(self.current_pacing)
    }

    pub fn is_ahead_of_pace(&self) -> bool {
        self.current_pacing > 1.0
    }
}

/// A contract joined with its delivery rows and derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCampaign {
    /// Unique across one processing run; equals `contract_terms.name`.
    pub name: String,
    pub contract_terms: ContractTerms,
    pub delivery_data: Vec<DeliveryRecord>,
    pub metrics: CampaignMetrics,
}

/// A campaign left out of the processed list, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCampaign {
    pub name: String,
    pub reason: String,
}

/// Result of processing every contract row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub campaigns: Vec<ProcessedCampaign>,
    pub skipped: Vec<SkippedCampaign>,
}

impl ProcessingOutcome {
    /// Number of contract rows that were considered.
    pub fn total(&self) -> usize {
        self.campaigns.len() + self.skipped.len()
    }

    pub fn skipped_names(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.name.as_str()).collect()
    }

    /// "Processed N of M campaigns" line shown to the user.
    pub fn summary_line(&self) -> String {
        format!(
            "Processed {} of {} campaigns",
            self.campaigns.len(),
            self.total()
        )
    }
}

/// Three-band traffic light for the pacing ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingStatus {
    /// Within ±5% of linear pacing.
    OnPace,
    /// Within ±15%.
    SlightlyOff,
    OffPace,
}

impl PacingStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if (0.95..=1.05).contains(&ratio) {
            PacingStatus::OnPace
        } else if (0.85..=1.15).contains(&ratio) {
            PacingStatus::SlightlyOff
        } else {
            PacingStatus::OffPace
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PacingStatus::OnPace => "on pace",
            PacingStatus::SlightlyOff => "watch",
            PacingStatus::OffPace => "off pace",
        }
    }
}

/// Column to order the overview table by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    Name,
    DaysInto,
    DaysUntil,
    Pacing,
    /// Yesterday's impressions relative to the remaining daily average needed.
    Yesterday,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment and defaults.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub contracts_path: PathBuf,
    pub delivery_path: PathBuf,
    pub as_of: NaiveDate,
    pub sort: Option<(SortField, SortDirection)>,
    /// Show the detail view for this campaign instead of the overview.
    pub campaign: Option<String>,
    /// `-` writes JSON to stdout.
    pub export_json: Option<PathBuf>,
}
