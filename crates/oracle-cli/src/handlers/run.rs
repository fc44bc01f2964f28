//! Run command handler: drive the live page over a sample suite

use super::{load_oracle_config, load_suite};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::RunArgs;
use oracle::{BrowserTransliterator, Canonicalizer, OracleConfig, SuiteReport, SuiteRunner};
use std::path::Path;

/// Execute the run command
pub fn execute_run(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let oracle_config = effective_config(args)?;
    let suite = load_suite(
        args.suite.as_deref(),
        args.filter.as_deref(),
        args.kind.map(Into::into),
    )?;
    if suite.is_empty() {
        return Err(CliError::invalid_argument("no samples match the given filter"));
    }
    let canonicalizer = Canonicalizer::with_variants(oracle_config.variant_table()?);

    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.header(&format!(
        "{} samples against {}",
        suite.len(),
        oracle_config.base_url
    ));
    tracing::info!(samples = suite.len(), url = %oracle_config.base_url, "starting run");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(async {
        let transliterator = BrowserTransliterator::launch(oracle_config).await?;
        let mut runner = SuiteRunner::new(transliterator)
            .with_canonicalizer(canonicalizer)
            .with_fail_fast(args.fail_fast);

        reporter.start_progress(suite.len() as u64, "samples");
        let report = runner
            .run_with(&suite, |outcome| {
                reporter.case(outcome);
                reporter.increment(1);
            })
            .await;
        reporter.finish();

        runner.into_inner().close().await?;
        Ok::<_, CliError>(report)
    })?;

    write_reports(&report, args)?;
    reporter.summary(&report);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::SuiteFailed {
            failed: report.failed() + report.errored(),
            total: report.total(),
        })
    }
}

/// Config file (or defaults) with command-line overrides applied
pub fn effective_config(args: &RunArgs) -> CliResult<OracleConfig> {
    let mut config = load_oracle_config(args.config.as_deref())?;
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.clone());
    }
    if args.headed {
        config = config.with_headless(false);
    }
    config.validate()?;
    Ok(config)
}

/// Write the JUnit and JSON reports that were asked for
pub fn write_reports(report: &SuiteReport, args: &RunArgs) -> CliResult<()> {
    if let Some(path) = &args.junit {
        write_report(path, &report.render_junit())?;
    }
    if let Some(path) = &args.json {
        write_report(path, &report.to_json()?)?;
    }
    Ok(())
}

fn write_report(path: &Path, content: &str) -> CliResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
