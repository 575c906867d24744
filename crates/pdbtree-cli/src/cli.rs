use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "pdbtree contributors",
    version,
    about = "pdbtree - inspect, convert and batch-parse Protein Data Bank (PDB) files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by `batch`.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the header summary and per-model counts of a PDB file.
    Info(InfoArgs),
    /// Re-write a PDB file, or dump its parsed records as JSON.
    Convert(ConvertArgs),
    /// Export every atom of a PDB file as a flat CSV table.
    Atoms(AtomsArgs),
    /// Parse many PDB files in parallel and report the outcome of each.
    Batch(BatchArgs),
}

/// Output formats understood by `convert`.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PDB records rebuilt from the assembled document.
    Pdb,
    /// The intermediate record dict, pretty-printed.
    Json,
}

/// Parse options shared by every subcommand; they override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ParseOptions {
    /// Fail when the parse records any data-quality anomaly.
    #[arg(long)]
    pub strict: bool,

    /// Reject inputs larger than this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_input_bytes: Option<usize>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input PDB file.
    #[arg(required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// List every recorded anomaly instead of only counting them.
    #[arg(long)]
    pub anomalies: bool,

    #[command(flatten)]
    pub parse: ParseOptions,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Output format, overriding `output.format` from the config file.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    pub parse: ParseOptions,
}

/// Arguments for the `atoms` subcommand.
#[derive(Args, Debug)]
pub struct AtomsArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Only export atoms of the model with this id.
    #[arg(short, long, value_name = "ID")]
    pub model: Option<i32>,

    #[command(flatten)]
    pub parse: ParseOptions,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input PDB files.
    #[arg(required = true, num_args = 1.., value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub parse: ParseOptions,
}
