//! Sequential suite execution against a [`Transliterator`].

use crate::canonical::Canonicalizer;
use crate::oracle::CaseOutcome;
use crate::report::SuiteReport;
use crate::result::OracleResult;
use crate::sample::{Sample, SampleSuite};
use crate::wait::StableText;
use async_trait::async_trait;
use std::time::Instant;

/// Something that turns Singlish input into settled Sinhala output.
///
/// The live implementation drives a browser page; tests substitute canned
/// output.
#[async_trait]
pub trait Transliterator: Send {
    /// Submit the sample's input and return the settled output
    async fn convert(&mut self, sample: &Sample) -> OracleResult<StableText>;
}

#[async_trait]
impl<T: Transliterator + ?Sized> Transliterator for Box<T> {
    async fn convert(&mut self, sample: &Sample) -> OracleResult<StableText> {
        (**self).convert(sample).await
    }
}

/// Runs samples one after another and collects a [`SuiteReport`]
#[derive(Debug)]
pub struct SuiteRunner<T> {
    transliterator: T,
    canonicalizer: Canonicalizer,
    fail_fast: bool,
    name: String,
}

impl<T: Transliterator> SuiteRunner<T> {
    /// Runner using the built-in variant table
    #[must_use]
    pub fn new(transliterator: T) -> Self {
        Self {
            transliterator,
            canonicalizer: Canonicalizer::new(),
            fail_fast: false,
            name: crate::report::DEFAULT_SUITE_NAME.to_string(),
        }
    }

    /// Use a custom canonicalizer
    #[must_use]
    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Stop after the first sample that does not pass
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Report name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Run one sample; driver errors become an errored outcome
    pub async fn run_sample(&mut self, sample: &Sample) -> CaseOutcome {
        tracing::debug!(id = %sample.id, mode = ?sample.kind.input_mode(), "running sample");
        let start = Instant::now();
        match self.transliterator.convert(sample).await {
            Ok(output) => CaseOutcome::judge(sample, &output, &self.canonicalizer, start.elapsed()),
            Err(err) => CaseOutcome::errored(sample, &err, start.elapsed()),
        }
    }

    /// Run the suite
    pub async fn run(&mut self, suite: &SampleSuite) -> SuiteReport {
        self.run_with(suite, |_| {}).await
    }

    /// Run the suite, calling `on_case` after every sample
    pub async fn run_with<F>(&mut self, suite: &SampleSuite, mut on_case: F) -> SuiteReport
    where
        F: FnMut(&CaseOutcome),
    {
        let mut report = SuiteReport::new(self.name.clone());
        for sample in suite {
            let outcome = self.run_sample(sample).await;
            on_case(&outcome);
            let passed = outcome.passed();
            report.push(outcome);
            if self.fail_fast && !passed {
                report.stopped_early = report.total() < suite.len();
                break;
            }
        }
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            errored = report.errored(),
            "{}",
            report.summary_line()
        );
        report
    }

    /// Give back the transliterator
    pub fn into_inner(self) -> T {
        self.transliterator
    }
}
