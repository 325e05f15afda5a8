//! Retrieval error types.
//!
//! These errors are designed to be serializable and not depend on external
//! error types like `reqwest::Error`. Adapters capture the message (and
//! status code when there is one) as plain data at their boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single retrieval failed.
///
/// Carried inside [`Outcome::Failure`](crate::Outcome::Failure). The
/// `Display` output is the human-readable cause shown to users and is never
/// empty.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrievalError {
    /// The target could not be interpreted by the retriever.
    #[error("invalid target: {message}")]
    InvalidTarget {
        /// Why the target was rejected.
        message: String,
    },

    /// The request could not be completed (connection, DNS, TLS, timeout,
    /// or a status the retriever's policy treats as failure).
    #[error("{message}")]
    Transport {
        /// Detailed error message.
        message: String,
        /// HTTP status code if available.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// The response started but draining its body failed.
    #[error("{message}")]
    Body {
        /// Detailed error message.
        message: String,
    },

    /// The run was cancelled before this retrieval finished.
    #[error("cancelled")]
    Cancelled,

    /// The per-task deadline elapsed before this retrieval finished.
    #[error("deadline exceeded after {after_ms}ms")]
    TimedOut {
        /// The configured deadline in milliseconds.
        after_ms: u64,
    },

    /// The retriever panicked; the panic was contained at the task boundary.
    #[error("retriever panicked: {message}")]
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl RetrievalError {
    /// Create an invalid target error.
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            message: non_empty(message.into(), "unrecognised target"),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: non_empty(message.into(), "transport failure"),
            status_code: None,
        }
    }

    /// Create a transport error with HTTP status code.
    pub fn transport_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Transport {
            message: non_empty(message.into(), "transport failure"),
            status_code: Some(status_code),
        }
    }

    /// Create a body read error.
    ///
    /// The target is left out; outcomes already carry it.
    pub fn body(cause: impl std::fmt::Display) -> Self {
        Self::Body {
            message: format!("while reading response body: {cause}"),
        }
    }

    /// Create a deadline error.
    pub fn timed_out(after: std::time::Duration) -> Self {
        Self::TimedOut {
            after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a panic error from a panic payload.
    pub fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        Self::Panicked {
            message: non_empty(message, "non-string panic payload"),
        }
    }

    /// Whether this failure was caused by cancellation rather than the target.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status code, when the failure carried one.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
