//! Command-line parsing for the campaign pacing report.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! ingest and metrics code. Every input flag can also come from the
//! environment (or a `.env` file), which is handy for scheduled runs.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::SortField;
use crate::metrics::parse_campaign_date;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "pacing",
    version,
    about = "Campaign pacing report from contract-terms and delivery CSVs"
)]
pub struct Cli {
    /// Log progress at info level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the campaign overview (or one campaign's detail) and the run summary.
    Report(ReportArgs),
    /// Print only the "N of M processed" summary and skipped campaigns.
    Summary(ReportArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Contract-terms CSV (Name, Start Date, End Date, Budget, CPM, Impressions Goal).
    #[arg(short = 'c', long, env = "PACING_CONTRACTS", value_name = "CSV")]
    pub contracts: PathBuf,

    /// Delivery-data CSV (DATE, CAMPAIGN ORDER NAME, IMPRESSIONS, SPEND).
    #[arg(short = 'd', long, env = "PACING_DELIVERY", value_name = "CSV")]
    pub delivery: PathBuf,

    /// Calendar day to measure pacing against (defaults to today, local time).
    #[arg(long, env = "PACING_AS_OF", value_name = "DATE", value_parser = parse_as_of)]
    pub as_of: Option<NaiveDate>,

    /// Sort the overview table by this column.
    #[arg(long, value_enum)]
    pub sort: Option<SortField>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Show the detailed pacing report for a single campaign.
    #[arg(long, value_name = "NAME")]
    pub campaign: Option<String>,

    /// Write the processed campaigns as JSON (`-` for stdout).
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

fn parse_as_of(s: &str) -> Result<NaiveDate, String> {
    parse_campaign_date(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_report_flags() {
        let cli = Cli::try_parse_from([
            "pacing",
            "report",
            "-c",
            "terms.csv",
            "-d",
            "delivery.csv",
            "--as-of",
            "2024-01-06",
            "--sort",
            "days-into",
            "--desc",
        ])
        .unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.contracts, PathBuf::from("terms.csv"));
        assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2024, 1, 6));
        assert_eq!(args.sort, Some(SortField::DaysInto));
        assert!(args.desc);
    }

    #[test]
    fn rejects_unparseable_as_of() {
        let res = Cli::try_parse_from([
            "pacing", "summary", "-c", "a.csv", "-d", "b.csv", "--as-of", "tomorrow",
        ]);
        assert!(res.is_err());
    }
}
