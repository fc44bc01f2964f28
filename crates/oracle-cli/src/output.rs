//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use oracle::{CaseOutcome, CaseStatus, SuiteReport};

/// Progress reporter for suite runs
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` samples
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    // Lines go through the bar while it is drawing so they don't tear it
    fn write_line(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) if !pb.is_finished() => pb.println(line),
            _ => {
                let _ = self.term.write_line(line);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        let prefix = if self.use_color {
            style("!").red().bold().to_string()
        } else {
            "ERROR".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.write_line("");
        self.write_line(&styled);
    }

    /// Print one finished sample
    pub fn case(&self, outcome: &CaseOutcome) {
        let line = case_line(outcome);
        match outcome.status {
            CaseStatus::Passed => self.success(&line),
            CaseStatus::Failed => self.failure(&line),
            CaseStatus::Errored => self.error(&line),
        }
    }

    /// Print the suite summary
    pub fn summary(&self, report: &SuiteReport) {
        let not_passed = report.failed() + report.errored();
        if self.quiet && not_passed == 0 {
            return;
        }

        let _ = self.term.write_line("");

        let duration_secs = report.duration().as_secs_f64();
        let stopped = if report.stopped_early {
            " (stopped early)"
        } else {
            ""
        };

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();

            let status = if not_passed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} samples in {:.2}s ({} passed, {} failed, {} errored){stopped}",
                status,
                report.total(),
                duration_secs,
                passed_style.apply_to(report.passed()),
                failed_style.apply_to(report.failed()),
                failed_style.apply_to(report.errored()),
            ));
        } else {
            let status = if not_passed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {} samples in {duration_secs:.2}s ({} passed, {} failed, {} errored){stopped}",
                report.total(),
                report.passed(),
                report.failed(),
                report.errored(),
            ));
        }
    }
}

/// `<title> (<ms>ms)`, plus the reason for anything that did not pass
#[must_use]
pub fn case_line(outcome: &CaseOutcome) -> String {
    let mut line = format!("{} ({}ms)", outcome.title, outcome.duration.as_millis());
    if let Some(error) = &outcome.error {
        line.push_str(": ");
        line.push_str(error);
    }
    line
}
