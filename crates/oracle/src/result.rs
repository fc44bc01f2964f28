//! Result and error types for the oracle.

use thiserror::Error;

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors that can occur while driving the system under test.
///
/// Canonicalization never fails and an output that never stabilizes is not an
/// error either; both are settled by the comparison, not by this type.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Browser support was not compiled in
    #[error("Browser feature not enabled. Rebuild with `--features browser` for live runs")]
    BrowserUnavailable,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element never became visible
    #[error("Element {selector} not visible after {ms}ms")]
    ElementNotVisible {
        /// CSS selector that was waited on
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Output region never showed any text
    #[error("Output {selector} stayed empty for {ms}ms")]
    OutputTimeout {
        /// CSS selector of the output region
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Reading text from the observed surface failed
    #[error("Failed to read text from {selector}: {message}")]
    ReadError {
        /// CSS selector being read
        selector: String,
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },

    /// Variant table could not be compiled
    #[error("Invalid variant rule {pattern:?}: {message}")]
    InvalidVariant {
        /// Offending pattern
        pattern: String,
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl OracleError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::PageError {
            message: message.into(),
        }
    }
}
