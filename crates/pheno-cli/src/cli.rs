//! CLI argument definitions for the phenotype tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pheno",
    version,
    about = "Convert REDCap survey exports to BIDS phenotype format",
    long_about = "Convert REDCap survey exports into the BIDS phenotype layout and\n\
                  apply configured calculations to converted phenotype datasets,\n\
                  keeping each dataset's JSON metadata sidecar in sync."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract survey variables into BIDS phenotype file pairs.
    Convert(ConvertArgs),

    /// Apply configured calculations to converted phenotype datasets.
    Calc(CalcArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Path to the REDCap survey export CSV.
    #[arg(long = "data-csv", value_name = "FILE")]
    pub data_csv: PathBuf,

    /// Path to the REDCap data dictionary CSV.
    #[arg(long = "dict-csv", value_name = "FILE")]
    pub dict_csv: PathBuf,

    /// BIDS entry configuration (file organization and tool metadata).
    #[arg(long = "bids-config", value_name = "FILE")]
    pub bids_config: PathBuf,

    /// Study BIDS directory; outputs land in its phenotype/ subdirectory.
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,
}

#[derive(Parser)]
pub struct CalcArgs {
    /// Directory holding <dataset>.tsv / <dataset>.json pairs.
    #[arg(long = "data-root", value_name = "DIR")]
    pub data_root: PathBuf,

    /// Configuration file listing calculations per phenotype dataset.
    #[arg(long = "calc-config", value_name = "FILE")]
    pub calc_config: PathBuf,

    /// Overwrite the original files instead of writing _calc outputs.
    #[arg(long = "overwrite")]
    pub overwrite: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
