//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "foodq",
    version,
    about = "Food-product data quality checks",
    long_about = "Normalize and validate food-product datasets.\n\n\
                  Checks field domains, cross-field nutrition and image rules, \n\
                  allergen vocabularies and product_id uniqueness."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw field values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize and validate a product CSV.
    Check(CheckArgs),

    /// List the fields of the schema.
    Fields(FieldsArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Product dataset (headed CSV).
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Engine configuration (TOML). Flags below override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field table replacing the embedded schema.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Write the normalized dataset to this CSV.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write one line per violation to this CSV.
    #[arg(long = "violations", value_name = "FILE")]
    pub violations: Option<PathBuf>,

    /// Print the report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Treat repeated product_id values as intentional.
    #[arg(long = "allow-duplicate-ids")]
    pub allow_duplicate_ids: bool,

    /// Encoding of an unknown Nutri-Score grade.
    #[arg(long = "unknown-sentinel", value_enum)]
    pub unknown_sentinel: Option<SentinelArg>,

    /// Accept decimal commas and read nan/null/none as empty.
    #[arg(long = "lenient-numeric")]
    pub lenient_numeric: bool,

    /// Reject records with advisories and match vocabularies exactly.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Carry undeclared columns through instead of failing the record.
    #[arg(long = "pass-through-unknown")]
    pub pass_through_unknown: bool,

    /// Compute log_* fields from their source columns.
    #[arg(long = "derive-log-fields")]
    pub derive_log_fields: bool,

    /// Exit with status 2 when any record is rejected or failed.
    #[arg(long = "fail-on-violations")]
    pub fail_on_violations: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Field table replacing the embedded schema.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SentinelArg {
    /// Unknown grades are written as 0.
    Zero,
    /// Unknown grades are left empty.
    Empty,
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
