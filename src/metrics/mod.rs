//! Metrics engine: value coercion (`parse`) and pacing math (`engine`).

pub mod engine;
pub mod parse;

pub use engine::{compute_metrics, process_all};
pub use parse::{DateParseError, parse_campaign_date};
