//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - runs the pipeline
//! - prints the text report or hands over to the TUI

use clap::Parser;
use tracing::info;

use crate::cli::{Command, CommonArgs, ReportArgs, TuiArgs};
use crate::domain::DashboardConfig;
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::report::{PriceRange, Selection};

pub mod pipeline;

/// Entry point for the `houses` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry HOUSES_DATA / HOUSES_LOG; clap reads the former via `env`.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    crate::logging::init(&args.common.log_level, LogTarget::Stderr)?;

    let config = DashboardConfig {
        table_limit: args.limit,
        ..config_from_common(&args.common)
    };
    let output = pipeline::run_pipeline(&config)?;
    let view = output.view(&initial_selection(&config));

    println!(
        "{}",
        crate::report::format_summary(
            &output.source.display().to_string(),
            output.summary.listings,
            output.summary.zipcodes,
            &view,
        )
    );
    println!("{}", crate::report::format_totals(&view.totals));
    println!("{}", crate::report::format_recommendations(&view.filtered, config.table_limit));
    if let Some(analytics) = &view.analytics {
        println!("{}", crate::report::format_analytics(analytics, args.width));
    }

    info!(shown = view.filtered.len(), "report printed");
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::logging::init(&args.common.log_level, LogTarget::File(args.log_file.clone()))?;

    let config = DashboardConfig {
        price_step_k: args.price_step,
        ..config_from_common(&args.common)
    };
    crate::tui::run(config)
}

pub fn config_from_common(args: &CommonArgs) -> DashboardConfig {
    DashboardConfig {
        data_path: args.data.clone(),
        price_low_k: args.low,
        price_high_k: args.high,
        zipcode: args.zipcode,
        price_step_k: 10,
        table_limit: None,
    }
}

/// Selection implied by the CLI flags before any interaction.
///
/// Bounds are clamped later, once the recommendations are known.
pub fn initial_selection(config: &DashboardConfig) -> Selection {
    let price = match (config.price_low_k, config.price_high_k) {
        (None, None) => None,
        (low, high) => Some(PriceRange {
            low_k: low.map(u64::from).unwrap_or(0),
            high_k: high.map(u64::from).unwrap_or(u64::MAX),
        }),
    };
    Selection {
        price,
        zipcode: config.zipcode,
    }
}

/// Rewrite argv so `houses` defaults to `houses tui`.
///
/// Rules:
/// - `houses`                        -> `houses tui`
/// - `houses -d sales.csv ...`       -> `houses tui -d sales.csv ...`
/// - `houses --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
