//! singlish-e2e: end-to-end checks for a Singlish → Sinhala transliterator
//!
//! ## Usage
//!
//! ```bash
//! singlish-e2e run                          # Run the 35 built-in samples
//! singlish-e2e run --kind negative --junit out/junit.xml
//! singlish-e2e normalize "සුබ  සතියක් ." --explain
//! singlish-e2e compare "6000 ක්" "6000ක්"
//! singlish-e2e cases --kind ui
//! ```

use clap::Parser;
use singlish_e2e::{handlers, Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    config.init_tracing();

    match cli.command {
        Commands::Run(args) => handlers::execute_run(&config, &args),
        Commands::Normalize(args) => handlers::execute_normalize(&args),
        Commands::Compare(args) => handlers::execute_compare(&args),
        Commands::Cases(args) => handlers::execute_cases(&args),
        Commands::Variants(args) => handlers::execute_variants(&args),
        Commands::Config(args) => handlers::execute_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.clone().into())
}
