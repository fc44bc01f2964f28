//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use oracle::SampleKind;
use std::path::PathBuf;

/// singlish-e2e: end-to-end checks for a Singlish → Sinhala transliterator
#[derive(Parser, Debug)]
#[command(name = "singlish-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the sample suite against the live transliterator page
    Run(RunArgs),

    /// Print the canonical form of a text
    Normalize(NormalizeArgs),

    /// Compare an actual output with an expected text
    Compare(CompareArgs),

    /// List samples
    Cases(CasesArgs),

    /// Print the orthographic variant table
    Variants(VariantsArgs),

    /// Print the effective run configuration as YAML
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// YAML run configuration
    #[arg(short, long, env = "SINGLISH_E2E_CONFIG")]
    pub config: Option<PathBuf>,

    /// YAML sample suite (default: built-in 35 samples)
    #[arg(short, long)]
    pub suite: Option<PathBuf>,

    /// Only samples whose id contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only samples of this kind
    #[arg(short, long)]
    pub kind: Option<KindArg>,

    /// Override the page under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Stop at the first sample that does not pass
    #[arg(long)]
    pub fail_fast: bool,

    /// Write a JUnit XML report
    #[arg(long)]
    pub junit: Option<PathBuf>,

    /// Write a JSON report
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Arguments for the normalize command
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Text to canonicalize
    pub text: String,

    /// Extra variant rules (YAML)
    #[arg(long)]
    pub variants: Option<PathBuf>,

    /// Print the text after every pipeline stage
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Text read from the page
    pub actual: String,

    /// Expected text
    pub expected: String,

    /// Extra variant rules (YAML)
    #[arg(long)]
    pub variants: Option<PathBuf>,
}

/// Arguments for the cases command
#[derive(Parser, Debug)]
pub struct CasesArgs {
    /// YAML sample suite (default: built-in 35 samples)
    #[arg(short, long)]
    pub suite: Option<PathBuf>,

    /// Only samples whose id contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only samples of this kind
    #[arg(short, long)]
    pub kind: Option<KindArg>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ListFormat,
}

/// Arguments for the variants command
#[derive(Parser, Debug)]
pub struct VariantsArgs {
    /// Extra variant rules (YAML)
    #[arg(long)]
    pub variants: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML run configuration to merge over the defaults
    #[arg(short, long, env = "SINGLISH_E2E_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Sample kind argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    /// Well-formed input
    Positive,
    /// Malformed or unusual input
    Negative,
    /// Typed input, realtime output
    Ui,
}

impl From<KindArg> for SampleKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Positive => Self::Positive,
            KindArg::Negative => Self::Negative,
            KindArg::Ui => Self::Ui,
        }
    }
}

/// Listing format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListFormat {
    /// One line per sample
    #[default]
    Text,
    /// JSON array
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
