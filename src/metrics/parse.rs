//! Cell-value coercion: currency amounts, counts and calendar dates.
//!
//! All functions are pure and independent of the host locale and timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::error::ContractError;

/// Lenient formats tried after strict ISO. Two-digit-year forms come before
/// their four-digit twins so `1/5/24` is read as 2024, not year 24.
const LENIENT_DATE_FORMATS: [&str; 11] = [
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const LENIENT_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date format: '{raw}'")]
pub struct DateParseError {
    pub raw: String,
}

/// Parse a date cell: strict `YYYY-MM-DD` first, then a lenient set of common
/// spreadsheet/export forms. Only the calendar date is kept.
pub fn parse_campaign_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(DateParseError { raw: raw.to_string() });
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }

    parse_lenient(s).ok_or_else(|| DateParseError { raw: raw.to_string() })
}

fn parse_lenient(s: &str) -> Option<NaiveDate> {
    if let Some(d) = LENIENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    LENIENT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Parse a currency amount such as `$1,250.50`.
///
/// `$` and `,` are stripped; blank, non-numeric and negative values are errors.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<f64, ContractError> {
    let cleaned = strip_chars(raw, &['$', ',']);
    let value = cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ContractError::InvalidNumber {
            field,
            raw: raw.to_string(),
        })?;
    if value < 0.0 {
        return Err(ContractError::Negative {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}

/// Parse a whole-number target such as `10,000`.
///
/// Fractional input is truncated toward zero.
pub fn parse_goal(field: &'static str, raw: &str) -> Result<u64, ContractError> {
    let cleaned = strip_chars(raw, &[',']);
    if let Ok(v) = cleaned.parse::<u64>() {
        return Ok(v);
    }
    let value = parse_plain_decimal(&cleaned)
        .ok_or_else(|| ContractError::InvalidNumber {
            field,
            raw: raw.to_string(),
        })?;
    if value < 0.0 {
        return Err(ContractError::Negative {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value.trunc() as u64)
}

/// Parse a delivery impressions cell. Blank is `Some(0)`; garbage is `None`.
///
/// Negative counts are returned as parsed; the caller decides how to treat them.
pub fn parse_impressions(raw: &str) -> Option<i64> {
    let cleaned = strip_chars(raw, &[',']);
    if cleaned.is_empty() {
        return Some(0);
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return Some(v);
    }
    parse_plain_decimal(&cleaned).map(|v| v.trunc() as i64)
}

/// `[+-]digits[.digits]` only; exponents, `inf` and `NaN` are rejected.
fn parse_plain_decimal(s: &str) -> Option<f64> {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !digits_only(whole) || !digits_only(frac) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn strip_chars(raw: &str, strip: &[char]) -> String {
    raw.trim().chars().filter(|c| !strip.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_dates_parse_strictly() {
        assert_eq!(parse_campaign_date("2024-01-06").unwrap(), ymd(2024, 1, 6));
        assert_eq!(parse_campaign_date(" 2024-02-29 ").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn lenient_forms_fall_back() {
        assert_eq!(parse_campaign_date("1/5/2024").unwrap(), ymd(2024, 1, 5));
        assert_eq!(parse_campaign_date("01/05/24").unwrap(), ymd(2024, 1, 5));
        assert_eq!(parse_campaign_date("2024/03/15").unwrap(), ymd(2024, 3, 15));
        assert_eq!(parse_campaign_date("Mar 15, 2024").unwrap(), ymd(2024, 3, 15));
        assert_eq!(parse_campaign_date("March 15, 2024").unwrap(), ymd(2024, 3, 15));
        assert_eq!(parse_campaign_date("15 Mar 2024").unwrap(), ymd(2024, 3, 15));
        assert_eq!(
            parse_campaign_date("2024-03-15T23:30:00").unwrap(),
            ymd(2024, 3, 15)
        );
        assert_eq!(
            parse_campaign_date("2024-03-15T23:30:00-05:00").unwrap(),
            ymd(2024, 3, 15)
        );
    }

    #[test]
    fn impossible_or_blank_dates_fail_with_raw_text() {
        assert_eq!(
            parse_campaign_date("2024-02-30").unwrap_err().raw,
            "2024-02-30"
        );
        assert!(parse_campaign_date("").is_err());
        assert!(parse_campaign_date("soon").is_err());
        assert!(parse_campaign_date("13/45/2024").is_err());
    }

    #[test]
    fn amounts_strip_currency_and_grouping() {
        assert_eq!(parse_amount("Budget", "$1,000").unwrap(), 1000.0);
        assert_eq!(parse_amount("CPM", " $5.00 ").unwrap(), 5.0);
        assert_eq!(parse_amount("CPM", "0").unwrap(), 0.0);
    }

    #[test]
    fn amounts_reject_blank_garbage_and_negative() {
        assert_eq!(
            parse_amount("Budget", "").unwrap_err(),
            ContractError::InvalidNumber {
                field: "Budget",
                raw: String::new()
            }
        );
        assert!(matches!(
            parse_amount("Budget", "$"),
            Err(ContractError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_amount("CPM", "n/a"),
            Err(ContractError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_amount("CPM", "NaN"),
            Err(ContractError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_amount("Budget", "-$5"),
            Err(ContractError::Negative { .. })
        ));
    }

    #[test]
    fn goals_parse_as_whole_numbers() {
        assert_eq!(parse_goal("Impressions Goal", "10,000").unwrap(), 10_000);
        assert_eq!(parse_goal("Impressions Goal", "2500.9").unwrap(), 2500);
        assert!(matches!(
            parse_goal("Impressions Goal", "-1"),
            Err(ContractError::Negative { .. })
        ));
        assert!(matches!(
            parse_goal("Impressions Goal", " "),
            Err(ContractError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn whole_number_fields_reject_exponent_notation() {
        assert!(matches!(
            parse_goal("Impressions Goal", "1e3"),
            Err(ContractError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_goal("Impressions Goal", "inf"),
            Err(ContractError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_goal("Impressions Goal", "."),
            Err(ContractError::InvalidNumber { .. })
        ));
        assert_eq!(parse_goal("Impressions Goal", ".5").unwrap(), 0);
        assert_eq!(parse_impressions("1e3"), None);
        assert_eq!(parse_impressions("2E2"), None);
        assert_eq!(parse_impressions("-12.9"), Some(-12));
    }

    #[test]
    fn impressions_default_to_zero_when_blank() {
        assert_eq!(parse_impressions(""), Some(0));
        assert_eq!(parse_impressions("1,234"), Some(1234));
        assert_eq!(parse_impressions("12.7"), Some(12));
        assert_eq!(parse_impressions("lots"), None);
    }
}
