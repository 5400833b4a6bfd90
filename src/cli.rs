use crate::io::OutputFormat;
use crate::report::ReportTable;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Scale a `band` value is read on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandScale {
    /// 0-100 compliance percentage
    Percent,
    /// 20-point weighted score
    Twenty,
    /// 30-point weighted score
    Thirty,
}

/// Table selector for `--table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableArg {
    Ranking,
    Triangulation,
    Variance,
    ProductTests,
    Summary,
    Pillars,
}

impl From<TableArg> for ReportTable {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Ranking => ReportTable::Ranking,
            TableArg::Triangulation => ReportTable::Triangulation,
            TableArg::Variance => ReportTable::Variance,
            TableArg::ProductTests => ReportTable::ProductTests,
            TableArg::Summary => ReportTable::Summary,
            TableArg::Pillars => ReportTable::Pillars,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fortimap")]
#[command(
    about = "Food fortification assessment scoring and reconciliation",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one or every cycle of an assessment snapshot
    Score {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Cycle to score (defaults to every cycle in the snapshot)
        #[arg(long)]
        cycle: Option<String>,

        /// Output format (defaults to the configured format, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Flat table to emit; CSV defaults to the ranking
        #[arg(long, value_enum)]
        table: Option<TableArg>,

        /// Configuration file (defaults to .fortimap.toml discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep rows marked inactive
        #[arg(long = "include-inactive")]
        include_inactive: bool,

        /// Disable colors and box-drawing characters
        #[arg(long)]
        plain: bool,
    },

    /// Classify a single value into its fortification band
    Band {
        /// Value to classify
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Scale the value is on
        #[arg(long, value_enum, default_value = "percent")]
        scale: BandScale,
    },

    /// Initialize a fortimap configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
