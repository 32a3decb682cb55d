//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - runs the ingest + metrics pipeline
//! - prints reports and writes the optional JSON export

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ReportArgs};
use crate::domain::{ReportConfig, SortDirection};
use crate::error::{AppError, EXIT_INPUT};

pub mod pipeline;

/// Entry point for the `pacing` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `pacing -c a.csv -d b.csv` behaves like `pacing report -c a.csv -d b.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Summary(args) => handle_report(args, OutputMode::SummaryOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    SummaryOnly,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Logs go to stderr so stdout stays clean for tables and JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_report(args: ReportArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = report_config_from_args(&args);
    let run = pipeline::run_report(&config)?;
    let json_to_stdout = config
        .export_json
        .as_deref()
        .is_some_and(|p| p.as_os_str() == "-");

    if mode == OutputMode::Full && !json_to_stdout {
        match &config.campaign {
            Some(name) => {
                let campaign = run
                    .outcome
                    .campaigns
                    .iter()
                    .find(|c| &c.name == name)
                    .ok_or_else(|| {
                        AppError::new(EXIT_INPUT, format!("No processed campaign named '{name}'."))
                    })?;
                println!("{}", crate::report::format_campaign_detail(campaign));
            }
            None => {
                let view = crate::report::sort_campaigns(&run.outcome.campaigns, config.sort);
                println!("{}", crate::report::format_overview(&view));
            }
        }
    }

    if json_to_stdout {
        eprint!("{}", crate::report::format_summary(&run.outcome));
    } else {
        print!("{}", crate::report::format_summary(&run.outcome));
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_json(path, &run.outcome, run.as_of)?;
    }

    Ok(())
}

pub fn report_config_from_args(args: &ReportArgs) -> ReportConfig {
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    ReportConfig {
        contracts_path: args.contracts.clone(),
        delivery_path: args.delivery.clone(),
        as_of: args.as_of.unwrap_or_else(|| Local::now().date_naive()),
        sort: args.sort.map(|field| (field, direction)),
        campaign: args.campaign.clone(),
        export_json: args.json.clone(),
    }
}

/// Rewrite argv so `pacing` defaults to `pacing report`.
///
/// Rules:
/// - `pacing`                       -> `pacing report` (inputs from env/.env)
/// - `pacing -c a.csv ...`          -> `pacing report -c a.csv ...`
/// - `pacing --help/--version/-h`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "summary");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["pacing"])), argv(&["pacing", "report"]));
    }

    #[test]
    fn leading_flags_are_report_flags() {
        assert_eq!(
            rewrite_args(argv(&["pacing", "-c", "a.csv", "-d", "b.csv"])),
            argv(&["pacing", "report", "-c", "a.csv", "-d", "b.csv"])
        );
    }

    #[test]
    fn help_and_subcommands_pass_through() {
        assert_eq!(rewrite_args(argv(&["pacing", "--help"])), argv(&["pacing", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["pacing", "summary", "-c", "a.csv"])),
            argv(&["pacing", "summary", "-c", "a.csv"])
        );
    }

    #[test]
    fn config_from_args_maps_sort_direction() {
        let cli = crate::cli::Cli::try_parse_from([
            "pacing", "report", "-c", "a.csv", "-d", "b.csv", "--as-of", "2024-01-06", "--sort",
            "pacing", "--desc",
        ])
        .unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        let config = report_config_from_args(&args);
        assert_eq!(
            config.sort,
            Some((crate::domain::SortField::Pacing, SortDirection::Desc))
        );
        assert_eq!(config.as_of.to_string(), "2024-01-06");
    }
}
