//! CLI argument definitions for the ISA-Tab validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "isatab-validator",
    version,
    about = "Validate ISA-Tab archives against isaconfig table configurations",
    long_about = "Validate an ISA-Tab investigation and the study and assay tables\n\
                  it declares against a directory of isaconfig XML configurations.\n\
                  Findings are reported as errors, warnings, and info messages with\n\
                  stable numeric codes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate an investigation file and its study and assay tables.
    Validate(ValidateArgs),

    /// List the built-in rules and the default selection per scope.
    Rules,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the investigation file (i_*.txt).
    #[arg(value_name = "INVESTIGATION")]
    pub investigation: PathBuf,

    /// Directory of isaconfig XML configuration files.
    #[arg(long = "config-dir", value_name = "DIR")]
    pub config_dir: PathBuf,

    /// Directory holding the study and assay tables
    /// (default: the investigation file's directory).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print the full report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
