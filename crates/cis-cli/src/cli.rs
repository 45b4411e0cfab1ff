//! CLI argument definitions for the checklist converter.

use std::path::PathBuf;

use cis_ingest::InputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cis-checklist",
    version,
    about = "Convert CIS Benchmark PDFs into audit checklist workbooks",
    long_about = "Extract recommendations from a CIS Benchmark PDF and write a\n\
                  section-organized XLSX audit checklist.\n\n\
                  Pre-extracted text (pages separated by form feeds) is accepted too."
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

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a benchmark into an audit checklist workbook.
    Convert(ConvertArgs),

    /// Show the section names used for sheet titles.
    Sections(SectionsArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Benchmark PDF (or form-feed separated text) to convert.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output workbook (default: <INPUT_STEM>_Audit_Checklist.xlsx).
    #[arg(value_name = "OUTPUT", conflicts_with = "output_flag")]
    pub output: Option<PathBuf>,

    /// Output workbook, as a flag.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_flag: Option<PathBuf>,

    /// TOML file with extraction options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write the extraction as JSON.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Input format.
    #[arg(long = "input-format", value_enum, default_value = "auto")]
    pub input_format: InputFormatArg,

    /// Title for the workbook sheets (default: detected benchmark title).
    #[arg(long = "title", value_name = "TEXT")]
    pub title: Option<String>,

    /// Extract and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl ConvertArgs {
    /// Output path from either the positional argument or `-o`.
    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.clone().or_else(|| self.output_flag.clone())
    }
}

#[derive(Parser)]
pub struct SectionsArgs {
    /// TOML file whose section names override the built-in table.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI input format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum InputFormatArg {
    Auto,
    Pdf,
    Text,
}

impl From<InputFormatArg> for InputFormat {
    fn from(arg: InputFormatArg) -> Self {
        match arg {
            InputFormatArg::Auto => Self::Auto,
            InputFormatArg::Pdf => Self::Pdf,
            InputFormatArg::Text => Self::Text,
        }
    }
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
