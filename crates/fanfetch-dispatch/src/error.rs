//! Orchestration errors.

use thiserror::Error;

/// Errors from a fan-out run.
///
/// Individual retrieval failures never surface here; they are outcomes in
/// the report. This only signals a broken delivery contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The completion channel closed before every task reported.
    #[error("completion channel closed after {received} of {expected} results")]
    Incomplete {
        /// Number of targets dispatched.
        expected: usize,
        /// Number of completions received before the channel closed.
        received: usize,
    },
}
