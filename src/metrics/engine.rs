//! Per-campaign pacing metrics.
//!
//! Linear pacing model: the impression goal is spread evenly over the
//! inclusive flight `[start_date, end_date]`. All day counts are whole calendar
//! days computed from `NaiveDate` subtraction, so DST never shifts a count.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    CampaignMetrics, ContractTerms, DeliveryRecord, ProcessedCampaign, ProcessingOutcome,
    SkippedCampaign,
};
use crate::error::ContractError;
use crate::metrics::parse::{parse_amount, parse_campaign_date, parse_goal, parse_impressions};

/// Compute pacing metrics for one contract as of `today`.
///
/// Only delivery rows whose campaign name equals `contract.name` exactly are
/// considered; everything else in `deliveries` is ignored.
pub fn compute_metrics(
    contract: &ContractTerms,
    deliveries: &[DeliveryRecord],
    today: NaiveDate,
) -> Result<CampaignMetrics, ContractError> {
    let budget = parse_amount("Budget", &contract.budget)?;
    let cpm = parse_amount("CPM", &contract.cpm)?;
    let impression_goal = parse_goal("Impressions Goal", &contract.impressions_goal)?;

    let start_date = parse_contract_date("Start Date", &contract.start_date)?;
    let end_date = parse_contract_date("End Date", &contract.end_date)?;

    let total_campaign_days = days_between(start_date, end_date) + 1;
    if total_campaign_days < 1 {
        return Err(ContractError::InvertedRange {
            start: contract.start_date.clone(),
            end: contract.end_date.clone(),
        });
    }

    let days_into_campaign = (days_between(start_date, today) + 1).clamp(0, total_campaign_days);
    let days_until_end = days_between(today, end_date).max(0);

    let expected_impressions =
        impression_goal as f64 / total_campaign_days as f64 * days_into_campaign as f64;

    let rows: Vec<&DeliveryRecord> = campaign_rows(&contract.name, deliveries).collect();
    let actual_impressions = rows
        .iter()
        .map(|row| row_impressions(row))
        .fold(0i64, i64::saturating_add);

    let current_pacing = if expected_impressions > 0.0 {
        actual_impressions as f64 / expected_impressions
    } else {
        0.0
    };

    let remaining_impressions =
        (i128::from(impression_goal) - i128::from(actual_impressions)).max(0) as u64;

    let remaining_average_needed = if days_until_end > 0 {
        remaining_impressions as f64 / days_until_end as f64
    } else {
        0.0
    };

    let yesterday_impressions = latest_row(&rows).map(row_impressions).unwrap_or(0);

    let yesterday_vs_needed = if remaining_average_needed > 0.0 {
        yesterday_impressions as f64 / remaining_average_needed
    } else {
        0.0
    };

    Ok(CampaignMetrics {
        campaign_name: contract.name.clone(),
        budget,
        cpm,
        impression_goal,
        start_date,
        end_date,
        as_of: today,
        total_campaign_days,
        days_into_campaign,
        days_until_end,
        expected_impressions,
        actual_impressions,
        current_pacing,
        remaining_impressions,
        remaining_average_needed,
        yesterday_impressions,
        yesterday_vs_needed,
    })
}

/// Compute metrics for every contract row, skipping (not failing) the ones
/// that cannot be computed.
///
/// Names in the result are unique: a repeated `Name` after a successful row
/// is reported as skipped.
pub fn process_all(
    contracts: &[ContractTerms],
    deliveries: &[DeliveryRecord],
    today: NaiveDate,
) -> ProcessingOutcome {
    let mut by_campaign: HashMap<&str, Vec<DeliveryRecord>> = HashMap::new();
    for row in deliveries {
        by_campaign
            .entry(row.campaign_name.as_str())
            .or_default()
            .push(row.clone());
    }

    let mut outcome = ProcessingOutcome::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for contract in contracts {
        let subset = by_campaign
            .get(contract.name.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let result = if seen.contains(contract.name.as_str()) {
            Err(ContractError::DuplicateName)
        } else {
            compute_metrics(contract, subset, today)
        };

        match result {
            Ok(metrics) => {
                seen.insert(contract.name.as_str());
                outcome.campaigns.push(ProcessedCampaign {
                    name: contract.name.clone(),
                    contract_terms: contract.clone(),
                    delivery_data: subset.to_vec(),
                    metrics,
                });
            }
            Err(err) => {
                warn!(campaign = %contract.name, reason = %err, "skipping campaign");
                outcome.skipped.push(SkippedCampaign {
                    name: contract.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    if outcome.skipped.is_empty() {
        debug!(campaigns = outcome.campaigns.len(), "processed all campaigns");
    } else {
        info!(
            processed = outcome.campaigns.len(),
            skipped = outcome.skipped.len(),
            names = %outcome.skipped_names().join(", "),
            "{}",
            outcome.summary_line()
        );
    }

    outcome
}

fn parse_contract_date(field: &'static str, raw: &str) -> Result<NaiveDate, ContractError> {
    parse_campaign_date(raw).map_err(|e| ContractError::InvalidDate { field, raw: e.raw })
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn campaign_rows<'a>(
    name: &'a str,
    deliveries: &'a [DeliveryRecord],
) -> impl Iterator<Item = &'a DeliveryRecord> + 'a {
    deliveries.iter().filter(move |row| row.campaign_name == name)
}

/// Impressions for one delivery row, never negative.
fn row_impressions(row: &DeliveryRecord) -> i64 {
    match parse_impressions(&row.impressions) {
        Some(v) if v >= 0 => v,
        Some(_) => {
            warn!(
                campaign = %row.campaign_name,
                date = %row.date,
                raw = %row.impressions,
                "negative IMPRESSIONS value counted as 0"
            );
            0
        }
        None => {
            warn!(
                campaign = %row.campaign_name,
                date = %row.date,
                raw = %row.impressions,
                "unreadable IMPRESSIONS value counted as 0"
            );
            0
        }
    }
}

/// Row with the most recent date. Rows with an unreadable date rank below
/// every dated row; among equal dates the earliest row in input order wins.
fn latest_row<'a>(rows: &[&'a DeliveryRecord]) -> Option<&'a DeliveryRecord> {
    let mut best: Option<(Option<NaiveDate>, &'a DeliveryRecord)> = None;
    for &row in rows {
        let date = parse_campaign_date(&row.date).ok();
        match best {
            Some((best_date, _)) if date <= best_date => {}
            _ => best = Some((date, row)),
        }
    }
    best.map(|(_, row)| row)
}
