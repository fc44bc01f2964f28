//! Suite results and their renderings: summary line, text, JSON, JUnit XML.

use crate::oracle::{CaseOutcome, CaseStatus};
use crate::result::OracleResult;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

/// Default JUnit suite name
pub const DEFAULT_SUITE_NAME: &str = "singlish-e2e";

/// Outcomes of one suite run, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Suite name
    pub name: String,
    /// Per-sample outcomes
    pub outcomes: Vec<CaseOutcome>,
    /// Whether the run stopped at the first failure
    pub stopped_early: bool,
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new(DEFAULT_SUITE_NAME)
    }
}

impl SuiteReport {
    /// Empty report
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Vec::new(),
            stopped_early: false,
        }
    }

    /// Append an outcome
    pub fn push(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of outcomes
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    fn count(&self, status: CaseStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Passed samples
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(CaseStatus::Passed)
    }

    /// Mismatched samples
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(CaseStatus::Failed)
    }

    /// Samples the driver could not run
    #[must_use]
    pub fn errored(&self) -> usize {
        self.count(CaseStatus::Errored)
    }

    /// Whether every sample passed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    /// Pass rate in percent; 100 for an empty run
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 100.0;
        }
        self.passed() as f64 / self.total() as f64 * 100.0
    }

    /// Sum of sample durations
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.outcomes.iter().map(|o| o.duration).sum()
    }

    /// Outcomes that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// One-line summary
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} passed, {} failed, {} errored ({} total, {:.1}% pass rate) in {:.2}s",
            self.passed(),
            self.failed(),
            self.errored(),
            self.total(),
            self.pass_rate(),
            self.duration().as_secs_f64()
        );
        if self.stopped_early {
            line.push_str(" [stopped at first failure]");
        }
        line
    }

    /// Plain-text report: one line per sample, then failure details
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for o in &self.outcomes {
            let _ = writeln!(out, "{:<5} {} ({}ms)", o.status, o.title, o.duration.as_millis());
        }

        let failures: Vec<_> = self.failures().filter_map(CaseOutcome::failure_detail).collect();
        if !failures.is_empty() {
            out.push_str("\nFailures:\n");
            for detail in failures {
                let _ = writeln!(out, "\n{detail}");
            }
        }

        let _ = writeln!(out, "\n{}", self.summary_line());
        out
    }

    /// Pretty JSON
    pub fn to_json(&self) -> OracleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JUnit XML; mismatches are `<failure>`, driver faults are `<error>`
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = writeln!(
            xml,
            r#"<testsuite name="{}" tests="{}" failures="{}" errors="{}" time="{:.3}">"#,
            escape_xml(&self.name),
            self.total(),
            self.failed(),
            self.errored(),
            self.duration().as_secs_f64()
        );

        for o in &self.outcomes {
            let _ = writeln!(
                xml,
                r#"  <testcase name="{}" classname="{}" time="{:.3}">"#,
                escape_xml(&o.title),
                o.kind,
                o.duration.as_secs_f64()
            );

            let detail = o.failure_detail().unwrap_or_default();
            match o.status {
                CaseStatus::Passed => {}
                CaseStatus::Failed => {
                    let _ = writeln!(
                        xml,
                        r#"    <failure message="output mismatch">{}</failure>"#,
                        escape_xml(&detail)
                    );
                }
                CaseStatus::Errored => {
                    let _ = writeln!(
                        xml,
                        r#"    <error message="{}">{}</error>"#,
                        escape_xml(o.error.as_deref().unwrap_or_default()),
                        escape_xml(&detail)
                    );
                }
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
