//! singlish-e2e CLI library
//!
//! Command-line interface for the Singlish → Sinhala transliteration oracle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    CasesArgs, Cli, ColorArg, Commands, CompareArgs, ConfigArgs, KindArg, ListFormat,
    NormalizeArgs, RunArgs, VariantsArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{case_line, ProgressReporter};
