//! Output stability polling.
//!
//! A live transliterator rewrites its output as input arrives, so reading the
//! output once is racy. [`StabilityPoller`] re-reads the observed text until it
//! has stopped changing for [`StabilityOptions::stable_for_ms`], and falls back
//! to a best-effort final read when the overall budget runs out.
//!
//! Both drivers share [`PollState`]:
//!
//! - [`StabilityPoller::await_stable`] blocks on a [`Clock`]
//! - [`await_stable_async`] sleeps on `tokio::time` (feature `async`)
//!
//! Never stabilizing is not an error. The only error is the reader's own.

use crate::clock::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default overall budget (15 seconds)
pub const DEFAULT_STABILITY_TIMEOUT_MS: u64 = 15_000;

/// Default quiet period before a value counts as settled
pub const DEFAULT_STABLE_FOR_MS: u64 = 500;

/// Default delay between reads
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 120;

/// Shortest delay between reads; a zero interval would never advance a fake clock
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

// =============================================================================
// OPTIONS
// =============================================================================

/// Stability polling options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityOptions {
    /// Overall budget in milliseconds
    pub timeout_ms: u64,
    /// Required quiet period in milliseconds
    pub stable_for_ms: u64,
    /// Delay between reads in milliseconds
    pub poll_interval_ms: u64,
    /// Whether empty text may count as settled
    pub accept_empty: bool,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_STABILITY_TIMEOUT_MS,
            stable_for_ms: DEFAULT_STABLE_FOR_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            accept_empty: false,
        }
    }
}

impl StabilityOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set overall budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set quiet period
    #[must_use]
    pub const fn with_stable_for(mut self, stable_for_ms: u64) -> Self {
        self.stable_for_ms = stable_for_ms;
        self
    }

    /// Set poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Allow empty text to settle
    #[must_use]
    pub const fn with_accept_empty(mut self, accept_empty: bool) -> Self {
        self.accept_empty = accept_empty;
        self
    }

    /// Overall budget as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Quiet period as Duration
    #[must_use]
    pub const fn stable_for(&self) -> Duration {
        Duration::from_millis(self.stable_for_ms)
    }

    /// Poll interval as Duration, never shorter than [`MIN_POLL_INTERVAL_MS`]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            Duration::from_millis(MIN_POLL_INTERVAL_MS)
        } else {
            Duration::from_millis(self.poll_interval_ms)
        }
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// How polling ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// Text held still for the quiet period
    Stable,
    /// Budget exhausted; text is the final best-effort read
    TimedOut,
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Trimmed text returned by the poller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableText {
    /// Observed text, trimmed
    pub text: String,
    /// How polling ended
    pub outcome: PollOutcome,
    /// Number of reads performed
    pub reads: u32,
    /// Time spent polling in milliseconds
    pub elapsed_ms: u64,
}

impl StableText {
    /// Whether the text settled before the budget ran out
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.outcome == PollOutcome::Stable
    }
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Polling state shared by the blocking and async drivers.
///
/// Times are offsets from the driver's start.
#[derive(Debug, Clone)]
pub struct PollState {
    options: StabilityOptions,
    last_seen: Option<String>,
    last_change: Duration,
    reads: u32,
}

impl PollState {
    /// Fresh state; `last_seen` matches no real read
    #[must_use]
    pub const fn new(options: StabilityOptions) -> Self {
        Self {
            options,
            last_seen: None,
            last_change: Duration::ZERO,
            reads: 0,
        }
    }

    /// Whether the budget is spent at `now`
    #[must_use]
    pub fn expired(&self, now: Duration) -> bool {
        now >= self.options.timeout()
    }

    /// Record a read taken at `now`; returns the text once it has settled
    pub fn observe(&mut self, raw: &str, now: Duration) -> Option<String> {
        self.reads = self.reads.saturating_add(1);
        let text = raw.trim();

        if self.last_seen.as_deref() != Some(text) {
            self.last_seen = Some(text.to_string());
            self.last_change = now;
            return None;
        }

        let settled = now.saturating_sub(self.last_change) >= self.options.stable_for();
        if settled && (self.options.accept_empty || !text.is_empty()) {
            return Some(text.to_string());
        }
        None
    }

    /// Reads so far
    #[must_use]
    pub const fn reads(&self) -> u32 {
        self.reads
    }

    fn settle(&self, text: String, elapsed: Duration) -> StableText {
        tracing::debug!(reads = self.reads, elapsed_ms = elapsed.as_millis() as u64, "output stable");
        StableText {
            text,
            outcome: PollOutcome::Stable,
            reads: self.reads,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    fn give_up(mut self, raw: &str, elapsed: Duration) -> StableText {
        self.reads = self.reads.saturating_add(1);
        let text = raw.trim().to_string();
        tracing::warn!(
            reads = self.reads,
            timeout_ms = self.options.timeout_ms,
            chars = text.chars().count(),
            "output did not stabilize; using final read"
        );
        StableText {
            text,
            outcome: PollOutcome::TimedOut,
            reads: self.reads,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

// =============================================================================
// READERS
// =============================================================================

/// Source of the text being watched
pub trait TextReader {
    /// Reader's own failure
    type Error;

    /// Current text; may be empty
    fn read_text(&mut self) -> Result<String, Self::Error>;
}

/// Closure-backed reader
pub struct FnReader<F> {
    read: F,
}

impl<F> fmt::Debug for FnReader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReader").finish_non_exhaustive()
    }
}

impl<F> FnReader<F> {
    /// Wrap a closure
    pub const fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F, E> TextReader for FnReader<F>
where
    F: FnMut() -> Result<String, E>,
{
    type Error = E;

    fn read_text(&mut self) -> Result<String, E> {
        (self.read)()
    }
}

// =============================================================================
// BLOCKING DRIVER
// =============================================================================

/// Blocking stability poller
#[derive(Debug, Clone)]
pub struct StabilityPoller<C = SystemClock> {
    options: StabilityOptions,
    clock: C,
}

impl StabilityPoller<SystemClock> {
    /// Poller on the wall clock
    #[must_use]
    pub fn new(options: StabilityOptions) -> Self {
        Self::with_clock(options, SystemClock::new())
    }
}

impl<C: Clock> StabilityPoller<C> {
    /// Poller on a custom clock
    #[must_use]
    pub const fn with_clock(options: StabilityOptions, clock: C) -> Self {
        Self { options, clock }
    }

    /// Options in use
    #[must_use]
    pub const fn options(&self) -> &StabilityOptions {
        &self.options
    }

    /// Poll `reader` until its text settles or the budget runs out
    pub fn await_stable<R>(&self, reader: &mut R) -> Result<StableText, R::Error>
    where
        R: TextReader + ?Sized,
    {
        let start = self.clock.now();
        let elapsed = || self.clock.now().saturating_sub(start);
        let mut state = PollState::new(self.options);

        while !state.expired(elapsed()) {
            let raw = reader.read_text()?;
            if let Some(text) = state.observe(&raw, elapsed()) {
                return Ok(state.settle(text, elapsed()));
            }
            self.clock.sleep(self.options.poll_interval());
        }

        let raw = reader.read_text()?;
        Ok(state.give_up(&raw, elapsed()))
    }
}

/// Poll on the wall clock
pub fn await_stable<R>(reader: &mut R, options: StabilityOptions) -> Result<StableText, R::Error>
where
    R: TextReader + ?Sized,
{
    StabilityPoller::new(options).await_stable(reader)
}

// =============================================================================
// ASYNC DRIVER
// =============================================================================

#[cfg(feature = "async")]
pub use async_driver::{await_stable_async, AsyncTextReader};

#[cfg(feature = "async")]
mod async_driver {
    use super::{PollState, StabilityOptions, StableText};
    use async_trait::async_trait;
    use tokio::time::{sleep, Instant};

    /// Async source of the text being watched
    #[async_trait]
    pub trait AsyncTextReader: Send {
        /// Reader's own failure
        type Error: Send;

        /// Current text; may be empty
        async fn read_text(&mut self) -> Result<String, Self::Error>;
    }

    /// Poll `reader` on tokio time until its text settles or the budget runs out
    pub async fn await_stable_async<R>(
        reader: &mut R,
        options: &StabilityOptions,
    ) -> Result<StableText, R::Error>
    where
        R: AsyncTextReader + ?Sized,
    {
        let start = Instant::now();
        let mut state = PollState::new(*options);

        while !state.expired(start.elapsed()) {
            let raw = reader.read_text().await?;
            if let Some(text) = state.observe(&raw, start.elapsed()) {
                return Ok(state.settle(text, start.elapsed()));
            }
            sleep(options.poll_interval()).await;
        }

        let raw = reader.read_text().await?;
        Ok(state.give_up(&raw, start.elapsed()))
    }
}
