//! Equivalence oracle: does the rendered output mean the expected text?

use crate::canonical::{normalize, CanonicalText, Canonicalizer};
use crate::result::OracleError;
use crate::sample::{Sample, SampleKind};
use crate::wait::{PollOutcome, StableText};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Raw and canonical forms of one comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Text as read from the page
    pub actual_raw: String,
    /// Expected text as written in the sample
    pub expected_raw: String,
    /// Canonical actual
    pub actual: CanonicalText,
    /// Canonical expected
    pub expected: CanonicalText,
}

impl Comparison {
    /// Whether both sides canonicalize to the same text
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.actual == self.expected
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_match() { "MATCH" } else { "MISMATCH" };
        writeln!(f, "actual   : {}", self.actual)?;
        writeln!(f, "expected : {}", self.expected)?;
        write!(f, "{verdict}")
    }
}

/// Compare with the built-in variant table
#[must_use]
pub fn compare(actual_raw: &str, expected: &str) -> Comparison {
    Comparison {
        actual_raw: actual_raw.to_string(),
        expected_raw: expected.to_string(),
        actual: normalize(actual_raw),
        expected: normalize(expected),
    }
}

impl Canonicalizer {
    /// Compare with this canonicalizer's variant table
    #[must_use]
    pub fn compare(&self, actual_raw: &str, expected: &str) -> Comparison {
        Comparison {
            actual_raw: actual_raw.to_string(),
            expected_raw: expected.to_string(),
            actual: self.normalize(actual_raw),
            expected: self.normalize(expected),
        }
    }
}

/// Verdict for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Output matched
    Passed,
    /// Output did not match
    Failed,
    /// The page could not be driven
    Errored,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
        })
    }
}

/// Result of running one sample
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    /// Sample id
    pub id: String,
    /// Test title
    pub title: String,
    /// Sample kind
    pub kind: SampleKind,
    /// Singlish input
    pub input: String,
    /// Expected text as written
    pub expected: String,
    /// Comparison, absent when the driver failed
    pub comparison: Option<Comparison>,
    /// How output polling ended
    pub poll: Option<PollOutcome>,
    /// Verdict
    pub status: CaseStatus,
    /// Wall time for the sample
    #[serde(serialize_with = "serialize_ms")]
    pub duration: Duration,
    /// Driver error message
    pub error: Option<String>,
}

fn serialize_ms<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl CaseOutcome {
    /// Judge a sample against the stable output read from the page
    #[must_use]
    pub fn judge(
        sample: &Sample,
        output: &StableText,
        canonicalizer: &Canonicalizer,
        duration: Duration,
    ) -> Self {
        let comparison = canonicalizer.compare(&output.text, sample.expected_text());
        let status = if comparison.is_match() {
            CaseStatus::Passed
        } else {
            tracing::warn!(
                id = %sample.id,
                "\n[{id}] INPUT   : {input}\n[{id}] EXPECTED: {expected}\n[{id}] ACTUAL  : {actual}",
                id = sample.id,
                input = sample.input,
                expected = sample.expected,
                actual = output.text,
            );
            CaseStatus::Failed
        };

        Self {
            id: sample.id.clone(),
            title: sample.title(),
            kind: sample.kind,
            input: sample.input.clone(),
            expected: sample.expected.clone(),
            comparison: Some(comparison),
            poll: Some(output.outcome),
            status,
            duration,
            error: None,
        }
    }

    /// Outcome for a sample whose run failed before a comparison
    #[must_use]
    pub fn errored(sample: &Sample, error: &OracleError, duration: Duration) -> Self {
        tracing::warn!(id = %sample.id, error = %error, "sample errored");
        Self {
            id: sample.id.clone(),
            title: sample.title(),
            kind: sample.kind,
            input: sample.input.clone(),
            expected: sample.expected.clone(),
            comparison: None,
            poll: None,
            status: CaseStatus::Errored,
            duration,
            error: Some(error.to_string()),
        }
    }

    /// Whether the sample passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }

    /// Raw text read from the page
    #[must_use]
    pub fn actual_raw(&self) -> Option<&str> {
        self.comparison.as_ref().map(|c| c.actual_raw.as_str())
    }

    /// Failure detail in the INPUT / EXPECTED / ACTUAL layout
    #[must_use]
    pub fn failure_detail(&self) -> Option<String> {
        match (&self.status, &self.comparison, &self.error) {
            (CaseStatus::Passed, _, _) => None,
            (_, _, Some(err)) => Some(format!(
                "[{id}] INPUT   : {input}\n[{id}] ERROR   : {err}",
                id = self.id,
                input = self.input,
            )),
            (_, Some(c), None) => Some(format!(
                "[{id}] INPUT   : {input}\n[{id}] EXPECTED: {expected}\n[{id}] ACTUAL  : {actual}",
                id = self.id,
                input = self.input,
                expected = self.expected,
                actual = c.actual_raw,
            )),
            (_, None, None) => None,
        }
    }
}
