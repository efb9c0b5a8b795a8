//! CLI argument definitions for colcmp.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use colcmp_core::{DEFAULT_DELIMITER, KeepPolicy};
use colcmp_ingest::SheetSelection;
use colcmp_output::ExportFormat;

#[derive(Parser)]
#[command(
    name = "colcmp",
    version,
    about = "Compare two spreadsheet tables by key, or group one table's rows",
    long_about = "Compare two spreadsheet tables by composite key, or collapse one table's \
                  rows per group-by combination.\n\n\
                  Reads CSV, TSV, XLSX, XLS and ODS files; writes CSV and/or XLSX."
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

    /// Include cell and key values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Cache root used for exports without --output-dir.
    #[arg(
        long = "cache-dir",
        value_name = "DIR",
        env = "COLCMP_CACHE_DIR",
        global = true
    )]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile two tables on key columns.
    Compare(CompareArgs),

    /// Collapse rows per group-by combination, merging selected columns.
    Group(GroupArgs),

    /// List the columns of a table with their inferred types.
    Columns(ColumnsArgs),

    /// Inspect or clear the export cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
pub struct CompareArgs {
    /// Left-hand table.
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Right-hand table.
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Key columns of the left table, comma separated, in key order.
    #[arg(long = "left-keys", value_name = "COLS", value_delimiter = ',', required = true)]
    pub left_keys: Vec<String>,

    /// Key columns of the right table, paired with --left-keys by position.
    #[arg(long = "right-keys", value_name = "COLS", value_delimiter = ',', required = true)]
    pub right_keys: Vec<String>,

    /// Sheet to read from a left workbook (default: its only sheet).
    #[arg(long = "left-sheet", value_name = "NAME")]
    pub left_sheet: Option<String>,

    /// Sheet to read from a right workbook (default: its only sheet).
    #[arg(long = "right-sheet", value_name = "NAME")]
    pub right_sheet: Option<String>,

    /// Also build the side-by-side view of matched rows.
    #[arg(long = "merge")]
    pub merge: bool,

    /// Highlight equal/different cells in the merged workbook (implies --merge).
    #[arg(long = "highlight")]
    pub highlight: bool,

    /// Prefix for left columns in the merged view.
    #[arg(long = "left-prefix", value_name = "PREFIX", default_value = "F1_")]
    pub left_prefix: String,

    /// Prefix for right columns in the merged view.
    #[arg(long = "right-prefix", value_name = "PREFIX", default_value = "F2_")]
    pub right_prefix: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl CompareArgs {
    pub fn wants_merge(&self) -> bool {
        self.merge || self.highlight
    }
}

#[derive(Args)]
pub struct GroupArgs {
    /// Table to group.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Columns whose combined values define a group.
    #[arg(long = "group-by", value_name = "COLS", value_delimiter = ',', required = true)]
    pub group_by: Vec<String>,

    /// Columns whose distinct values are joined per group.
    #[arg(long = "merge", value_name = "COLS", value_delimiter = ',')]
    pub merge: Vec<String>,

    /// Columns to delete before grouping.
    #[arg(long = "delete", value_name = "COLS", value_delimiter = ',')]
    pub delete: Vec<String>,

    /// Separator placed between merged values.
    #[arg(long = "delimiter", value_name = "TEXT", default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Which value the remaining columns keep.
    #[arg(long = "keep", value_enum, default_value = "first-row")]
    pub keep: KeepArg,

    /// Workbook sheet to read.
    #[arg(long = "sheet", value_name = "NAME", default_value = "Sheet1")]
    pub sheet: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Table to inspect.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Workbook sheet to read (default: the first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Directory for exported files (default: a fresh run directory in the cache).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Export format.
    #[arg(long = "format", value_enum, default_value = "xlsx")]
    pub format: FormatArg,

    /// Compute and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Rows shown per table preview.
    #[arg(long = "preview-rows", value_name = "N", default_value_t = 5)]
    pub preview_rows: usize,
}

#[derive(Subcommand, Clone, Copy)]
pub enum CacheAction {
    /// Print the cache location and its size on disk.
    Size,
    /// Delete every cached export.
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
    Both,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Both => ExportFormat::Both,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KeepArg {
    FirstRow,
    FirstNonEmpty,
}

impl From<KeepArg> for KeepPolicy {
    fn from(value: KeepArg) -> Self {
        match value {
            KeepArg::FirstRow => KeepPolicy::FirstRow,
            KeepArg::FirstNonEmpty => KeepPolicy::FirstNonEmpty,
        }
    }
}

/// Maps an optional `--sheet` value onto a selection, falling back to `default`.
pub fn sheet_selection(sheet: Option<&str>, default: SheetSelection) -> SheetSelection {
    sheet.map_or(default, |name| SheetSelection::Named(name.to_string()))
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
