//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Some samples did not pass
    #[error("{failed} of {total} samples did not pass")]
    SuiteFailed {
        /// Failed or errored samples
        failed: usize,
        /// Samples run
        total: usize,
    },

    /// Canonical forms differ
    #[error("canonical forms differ")]
    Mismatch,

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Oracle library error
    #[error("{0}")]
    Oracle(#[from] oracle::OracleError),

    /// Report serialization error
    #[error("Report generation failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("no samples match 'xyz'");
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_suite_failed() {
        let err = CliError::SuiteFailed {
            failed: 3,
            total: 35,
        };
        assert_eq!(err.to_string(), "3 of 35 samples did not pass");
    }

    #[test]
    fn test_oracle_error_is_transparent() {
        let err: CliError = oracle::OracleError::BrowserUnavailable.into();
        assert!(err.to_string().starts_with("Browser feature not enabled"));
    }

    #[test]
    fn test_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "suite.yaml");
        let err: CliError = io.into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
