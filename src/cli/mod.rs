use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use logtable::expr::NamespacePolicy;
use logtable::segment::HeaderPolicy;
use logtable::table::ExportFormat;

mod config;
mod extract;
mod info;
mod scan;

/// logtable - extract numeric tables from simulation logs
#[derive(Parser)]
#[command(name = "logtable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// What to do with buffered rows when a new header appears mid-table.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum HeaderPolicyArg {
    /// Drop the unfinished table
    Discard,
    /// Keep the unfinished table as its own segment
    Flush,
}

impl From<HeaderPolicyArg> for HeaderPolicy {
    fn from(arg: HeaderPolicyArg) -> Self {
        match arg {
            HeaderPolicyArg::Discard => HeaderPolicy::Discard,
            HeaderPolicyArg::Flush => HeaderPolicy::Flush,
        }
    }
}

/// Which columns derived-column operations can read.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum NamespaceArg {
    /// Only the columns present before any operation ran
    Snapshot,
    /// Also the results of earlier operations
    Chained,
}

impl From<NamespaceArg> for NamespacePolicy {
    fn from(arg: NamespaceArg) -> Self {
        match arg {
            NamespaceArg::Snapshot => NamespacePolicy::Snapshot,
            NamespaceArg::Chained => NamespacePolicy::Chained,
        }
    }
}

/// Output format override.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Comma-separated values
    Csv,
    /// JSON document with ordered columns
    Json,
    /// Apache Parquet with plot metadata in the footer
    Parquet,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Parquet => ExportFormat::Parquet,
        }
    }
}

/// Options shared by commands that scan a log
#[derive(Args, Debug)]
pub struct ScanOptions {
    /// Log file to scan
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column names; the first is the x axis, the rest are plotted against it
    #[arg(short, long, num_args = 1.., value_name = "NAME")]
    pub columns: Vec<String>,

    /// What to do when a header interrupts an unfinished table
    #[arg(long, value_enum)]
    pub header_policy: Option<HeaderPolicyArg>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments of the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub scan: ScanOptions,

    /// Instance to extract: "first", "last", or a 1-based number
    #[arg(short, long)]
    pub instance: Option<String>,

    /// Derived columns, e.g. "KinEng = TotEng - PotEng"
    #[arg(short, long, num_args = 1.., value_name = "NAME=EXPR")]
    pub operations: Vec<String>,

    /// Which columns operations can read
    #[arg(long, value_enum)]
    pub namespace: Option<NamespaceArg>,

    /// Output file (CSV on stdout when omitted)
    #[arg(long, visible_alias = "output", value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Label for the x axis
    #[arg(long)]
    pub xlabel: Option<String>,

    /// Label for the y axis
    #[arg(long)]
    pub ylabel: Option<String>,

    /// Legends as a list string, e.g. '["PE", "Total"]'
    #[arg(long)]
    pub legends: Option<String>,

    /// Use a logarithmic y axis
    #[arg(long)]
    pub logscale: bool,

    // === Advanced tuning flags (hidden from --help) ===
    /// Compression level for ZSTD (1-22, default: 3)
    #[arg(long, hide = true)]
    pub compression_level: Option<i32>,

    /// Row group size (number of rows per row group)
    #[arg(long, hide = true)]
    pub row_group_size: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one table from a log, add derived columns, and export it
    Extract(ExtractArgs),

    /// List every table found in a log
    Scan(ScanOptions),

    /// Display information about an exported Parquet file
    Info {
        /// Parquet file written by `extract`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => extract::run(args),
        Commands::Scan(options) => scan::run(options),
        Commands::Info { file } => info::run(file),
    }
}
