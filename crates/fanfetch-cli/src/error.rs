//! CLI-specific error types and mappings.

use fanfetch_dispatch::DispatchError;
use fanfetch_http::HttpError;
use thiserror::Error;

/// CLI-specific error type.
///
/// Failed fetches are not errors: they are lines in the report. These cover
/// the run itself failing.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The fan-out run broke its delivery contract.
    #[error("Run failed: {0}")]
    Dispatch(String),

    /// The report could not be rendered or written.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h:
    /// - 70: Internal software error
    /// - 74: I/O error
    /// - 78: Configuration error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Dispatch(_) => 70, // EX_SOFTWARE
            Self::Output(_) => 74,   // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<DispatchError> for CliError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Dispatch("x".into()).exit_code(), 70);
        assert_eq!(CliError::Output("x".into()).exit_code(), 74);
    }

    #[test]
    fn test_dispatch_error_maps_to_dispatch() {
        let err: CliError = DispatchError::Incomplete {
            expected: 3,
            received: 2,
        }
        .into();
        assert!(matches!(err, CliError::Dispatch(_)));
        assert!(err.to_string().contains("2 of 3"));
    }
}
