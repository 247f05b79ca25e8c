//! CLI argument definitions for `rowscan`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rowscan_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "rowscan",
    version,
    about = "Stream delimiter-separated files row by row",
    long_about = "Preview, count and column-map delimiter-separated files.\n\n\
                  Records are read one at a time; quoted fields may span lines."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -vvv for trace, -q to silence).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level: off, error, warn, info, debug or trace (overrides -v/-q).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<LevelFilter>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value_t, global = true)]
    pub log_format: LogFormat,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the first rows of a file as a table.
    Preview(PreviewArgs),

    /// Write selected columns of a file under new names.
    Copy(CopyArgs),

    /// Count the records of a file.
    Count(CountArgs),
}

/// Options shared by every command that reads a file.
#[derive(Args)]
pub struct ReaderArgs {
    /// Input file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (`\t` or `tab` for a tab).
    #[arg(long = "delimiter", short = 'd', default_value = ",")]
    pub delimiter: String,

    /// Field qualifier; pass an empty string to disable quoting.
    #[arg(long = "qualifier", default_value = "\"")]
    pub qualifier: String,

    /// Column names, comma-separated; the first line is then data.
    #[arg(long = "header", value_delimiter = ',')]
    pub header: Vec<String>,

    /// Skip empty lines between records instead of reading them as rows.
    #[arg(long = "skip-blank-lines")]
    pub skip_blank_lines: bool,

    /// Reject records larger than this many bytes.
    #[arg(long = "max-record-bytes", value_name = "BYTES")]
    pub max_record_bytes: Option<usize>,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Number of rows to show.
    #[arg(long = "limit", short = 'n', default_value_t = 20)]
    pub limit: usize,

    /// Infer booleans, numbers, dates and GUIDs instead of showing raw text.
    #[arg(long = "infer")]
    pub infer: bool,
}

#[derive(Args)]
pub struct CopyArgs {
    #[command(flatten)]
    pub reader: ReaderArgs,

    /// JSON file with `[{"source": ..., "destination": ...}]` entries.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: PathBuf,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CountArgs {
    #[command(flatten)]
    pub reader: ReaderArgs,
}
