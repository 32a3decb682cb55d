//! Reporting utilities: sorting and formatted terminal output.

pub mod format;

use std::cmp::Ordering;

use crate::domain::{ProcessedCampaign, SortDirection, SortField};

pub use format::*;

/// Sorted view over the processed campaigns. The input slice is untouched and
/// equal keys keep their input order.
pub fn sort_campaigns(
    campaigns: &[ProcessedCampaign],
    sort: Option<(SortField, SortDirection)>,
) -> Vec<&ProcessedCampaign> {
    let mut view: Vec<&ProcessedCampaign> = campaigns.iter().collect();
    let Some((field, direction)) = sort else {
        return view;
    };

    view.sort_by(|a, b| {
        let ord = compare_by(a, b, field);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    view
}

fn compare_by(a: &ProcessedCampaign, b: &ProcessedCampaign, field: SortField) -> Ordering {
    let (ma, mb) = (&a.metrics, &b.metrics);
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::DaysInto => ma.days_into_campaign.cmp(&mb.days_into_campaign),
        SortField::DaysUntil => ma.days_until_end.cmp(&mb.days_until_end),
        SortField::Pacing => ma.current_pacing.total_cmp(&mb.current_pacing),
        SortField::Yesterday => ma.yesterday_vs_needed.total_cmp(&mb.yesterday_vs_needed),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::domain::{ContractTerms, DeliveryRecord};
    use crate::metrics::process_all;

    use super::ProcessedCampaign;

    pub fn campaigns() -> Vec<ProcessedCampaign> {
        let terms = |name: &str, end: &str, goal: &str| ContractTerms {
            name: name.to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: end.to_string(),
            budget: "$12,500.50".to_string(),
            cpm: "$4.25".to_string(),
            impressions_goal: goal.to_string(),
        };
        let row = |date: &str, name: &str, impressions: &str| DeliveryRecord {
            date: date.to_string(),
            campaign_name: name.to_string(),
            impressions: impressions.to_string(),
            spend: "$1.00".to_string(),
        };
        let contracts = vec![
            terms("beta", "2024-01-10", "10,000"),
            terms("Alpha", "2024-01-31", "31,000"),
            terms("gamma", "2024-01-06", "600"),
        ];
        let delivery = vec![
            row("2024-01-05", "beta", "5,000"),
            row("2024-01-05", "Alpha", "6,000"),
            row("2024-01-05", "gamma", "600"),
        ];
        process_all(&contracts, &delivery, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()).campaigns
    }
}
