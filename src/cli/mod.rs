//! Command-line parsing for the house recommendation dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and presentation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "houses", version, about = "House purchase recommendations from a sales CSV")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (map, recommendations, zipcode analytics).
    Tui(TuiArgs),
    /// Print the recommendations and zipcode analytics as text.
    Report(ReportArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Sales CSV with the 21-column King County layout.
    #[arg(short = 'd', long, env = "HOUSES_DATA", default_value = "kc_house_data.csv")]
    pub data: PathBuf,

    /// Lower price bound, in thousands (defaults to the cheapest recommendation).
    #[arg(long)]
    pub low: Option<u32>,

    /// Upper price bound, in thousands (defaults to the dearest recommendation).
    #[arg(long)]
    pub high: Option<u32>,

    /// Zipcode for the analytics section (defaults to the lowest zipcode).
    #[arg(short = 'z', long)]
    pub zipcode: Option<u32>,

    /// Log filter used when `HOUSES_LOG` is not set (e.g. `info`, `debug`).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Price slider step, in thousands.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub price_step: u32,

    /// Log file (the terminal is busy drawing the dashboard).
    #[arg(long, default_value = "houses.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print at most N table rows.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Width of the ASCII bar charts (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_parse() {
        let cli = Cli::parse_from([
            "houses", "report", "--data", "sales.csv", "--low", "200", "--high", "450", "-z", "98103",
            "--limit", "5",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.common.data, PathBuf::from("sales.csv"));
        assert_eq!(args.common.low, Some(200));
        assert_eq!(args.common.high, Some(450));
        assert_eq!(args.common.zipcode, Some(98103));
        assert_eq!(args.limit, Some(5));
        assert_eq!(args.width, 40);
    }

    #[test]
    fn zero_price_step_is_rejected() {
        let res = Cli::try_parse_from(["houses", "tui", "--price-step", "0"]);
        assert!(res.is_err());
    }
}
