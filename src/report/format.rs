//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the metrics code stays free of presentation concerns
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDate;

use crate::domain::{ProcessedCampaign, ProcessingOutcome};

/// Overview table: one line per campaign.
pub fn format_overview(campaigns: &[&ProcessedCampaign]) -> String {
    let name_width = campaigns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("campaign".len());

    let mut out = String::new();
    out.push_str(
        format!(
            "{:<name_width$} {:>10} {:>10} {:>10} {:>14} {:<8}",
            "campaign", "days_into", "days_left", "pacing", "yday_vs_need", "status"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<name_width$} {:-<10} {:-<10} {:-<10} {:-<14} {:-<8}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for c in campaigns {
        let m = &c.metrics;
        out.push_str(
            format!(
                "{:<name_width$} {:>10} {:>10} {:>10} {:>14} {:<8}",
                c.name,
                m.days_into_campaign,
                m.days_until_end,
                format_percent(m.current_pacing),
                format_percent(m.yesterday_vs_needed),
                m.pacing_status().display_name(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Detailed pacing report for one campaign.
pub fn format_campaign_detail(campaign: &ProcessedCampaign) -> String {
    let m = &campaign.metrics;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", campaign.name));
    out.push_str(&format!(
        "{} - {} ({} days, as of {})\n\n",
        format_date(m.start_date),
        format_date(m.end_date),
        m.total_campaign_days,
        format_date(m.as_of),
    ));

    let pace_note = if m.is_ahead_of_pace() {
        "ahead of pace"
    } else {
        "behind pace"
    };

    let lines = [
        ("Budget", format_currency(m.budget)),
        ("CPM", format_currency(m.cpm)),
        ("Impression goal", format_count(m.impression_goal as f64)),
        ("Days into campaign", m.days_into_campaign.to_string()),
        ("Days until end", m.days_until_end.to_string()),
        ("Expected impressions", format_count(m.expected_impressions)),
        ("Actual impressions", format_count(m.actual_impressions as f64)),
        (
            "Current pacing",
            format!(
                "{} ({pace_note}, {})",
                format_percent(m.current_pacing),
                m.pacing_status().display_name()
            ),
        ),
        ("Remaining impressions", format_count(m.remaining_impressions as f64)),
        ("Remaining daily avg needed", format_count(m.remaining_average_needed)),
        ("Yesterday's impressions", format_count(m.yesterday_impressions as f64)),
        ("Yesterday vs needed", format_percent(m.yesterday_vs_needed)),
    ];
    for (label, value) in lines {
        out.push_str(&format!("{label:<27} {value}\n"));
    }

    out
}

/// "Processed N of M campaigns" plus one line per skipped campaign.
pub fn format_summary(outcome: &ProcessingOutcome) -> String {
    let mut out = outcome.summary_line();
    out.push('\n');
    for skipped in &outcome.skipped {
        out.push_str(&format!("  (skipped {}) {}\n", skipped.name, skipped.reason));
    }
    out
}

/// Ratio as a percentage with one decimal (`0.8333` -> `83.3%`).
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Rounded whole number with thousands separators.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(&digits))
}

/// USD amount with two decimals (`12500.5` -> `$12,500.50`).
pub fn format_currency(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}.{frac}", group_thousands(whole))
}

/// `Jan 05, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkippedCampaign;
    use crate::report::test_support::campaigns;

    #[test]
    fn number_formatting() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1249.5), "1,250");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
        assert_eq!(format_count(-4200.0), "-4,200");
        assert_eq!(format_currency(12500.5), "$12,500.50");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_percent(5000.0 / 6000.0), "83.3%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn date_formatting() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(d), "Jan 05, 2024");
    }

    #[test]
    fn overview_has_one_line_per_campaign() {
        let all = campaigns();
        let view: Vec<&ProcessedCampaign> = all.iter().collect();
        let table = format_overview(&view);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2 + all.len());
        assert!(lines[0].starts_with("campaign"));
        assert!(lines[2].starts_with("beta"));
        assert!(lines[2].contains("83.3%"));
        assert!(lines[3].contains("on pace"));
        assert!(table.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn detail_shows_core_metrics() {
        let all = campaigns();
        let detail = format_campaign_detail(&all[0]);
        assert!(detail.contains("=== beta ==="));
        assert!(detail.contains("Jan 01, 2024 - Jan 10, 2024 (10 days, as of Jan 06, 2024)"));
        assert!(detail.contains("$12,500.50"));
        assert!(detail.contains("6,000"));
        assert!(detail.contains("83.3% (behind pace, off pace)"));
        assert!(detail.contains("1,250"));
    }

    #[test]
    fn summary_lists_skipped() {
        let outcome = ProcessingOutcome {
            campaigns: campaigns(),
            skipped: vec![SkippedCampaign {
                name: "delta".to_string(),
                reason: "`CPM` is not a number: 'x'".to_string(),
            }],
        };
        let summary = format_summary(&outcome);
        assert!(summary.starts_with("Processed 3 of 4 campaigns\n"));
        assert!(summary.contains("(skipped delta) `CPM` is not a number: 'x'"));
    }
}
