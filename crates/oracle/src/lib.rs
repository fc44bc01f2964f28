//! Singlish Oracle: equivalence checking for Singlish → Sinhala transliteration
//!
//! A live transliterator renders its output incrementally and with incidental
//! noise (spacing, punctuation, alternate spellings, invisible joiners). This
//! crate decides whether that output *means* the expected Sinhala text.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         SINGLISH ORACLE                           │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌──────────────┐   ┌─────────────────────────┐ │
//! │  │ SampleSuite │──►│ SuiteRunner  │──►│ Transliterator          │ │
//! │  │ (35 cases)  │   │              │   │ (Chromium via CDP)      │ │
//! │  └─────────────┘   └──────┬───────┘   └───────────┬─────────────┘ │
//! │                           │                       │ StabilityPoller│
//! │                           ▼                       ▼               │
//! │                    ┌──────────────┐      ┌─────────────────┐      │
//! │                    │ compare()    │◄─────│ StableText      │      │
//! │                    │ Canonicalizer│      └─────────────────┘      │
//! │                    └──────┬───────┘                               │
//! │                           ▼                                       │
//! │                    SuiteReport (text / JSON / JUnit)              │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use oracle::{compare, normalize};
//!
//! assert_eq!(normalize("6000 ක්"), normalize("6000ක්"));
//! assert!(compare("ඔයාගෙ  පොත .", "ඔයාගේ පොත").is_match());
//! ```
//!
//! # Features
//!
//! - `async` (default): async stability poller, [`Transliterator`] and
//!   [`SuiteRunner`]
//! - `browser`: live Chromium driver ([`BrowserTransliterator`])

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Text canonicalization pipeline
pub mod canonical;

/// Time source for blocking polls
pub mod clock;

#[allow(clippy::missing_errors_doc)]
mod config;

#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod locator;

mod oracle;

#[allow(clippy::cast_precision_loss, clippy::format_push_string)]
mod report;

mod result;

#[allow(clippy::missing_errors_doc)]
mod sample;

/// Data-driven orthographic variant table
#[allow(clippy::missing_errors_doc)]
pub mod variants;

/// Output stability polling
pub mod wait;

#[cfg(feature = "async")]
#[allow(clippy::missing_errors_doc)]
mod browser;

#[cfg(feature = "async")]
mod runner;

pub use canonical::{normalize, CanonicalText, Canonicalizer, Stage, StageTrace};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    OracleConfig, DEFAULT_BASE_URL, DEFAULT_INPUT_SELECTOR, DEFAULT_OUTPUT_SELECTOR,
    DEFAULT_TYPE_DELAY_MS, DEFAULT_VISIBLE_TIMEOUT_MS,
};
pub use locator::{Selector, TextProbe};
pub use oracle::{compare, CaseOutcome, CaseStatus, Comparison};
pub use report::{SuiteReport, DEFAULT_SUITE_NAME};
pub use result::{OracleError, OracleResult};
pub use sample::{InputMode, Sample, SampleKind, SampleSuite};
pub use variants::{VariantRule, VariantTable};
pub use wait::{
    await_stable, FnReader, PollOutcome, PollState, StabilityOptions, StabilityPoller, StableText,
    TextReader,
};

#[cfg(feature = "async")]
pub use browser::{BrowserConfig, BrowserTransliterator};
#[cfg(feature = "browser")]
pub use browser::{Browser, Page};
#[cfg(feature = "async")]
pub use runner::{SuiteRunner, Transliterator};
#[cfg(feature = "async")]
pub use wait::{await_stable_async, AsyncTextReader};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        compare, normalize, CaseOutcome, CaseStatus, Comparison, OracleConfig, OracleError,
        OracleResult, Sample, SampleKind, SampleSuite, StabilityOptions, StableText, SuiteReport,
    };

    #[cfg(feature = "async")]
    pub use super::{BrowserTransliterator, SuiteRunner, Transliterator};
}
