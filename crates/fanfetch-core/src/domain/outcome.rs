//! Per-target outcomes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Target;
use super::duration_ms;
use crate::error::RetrievalError;

/// The terminal outcome of retrieving one target.
///
/// Exactly one outcome is produced per submitted target, whether the
/// retrieval succeeded, failed, timed out or was cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The body was fully drained.
    Success {
        target: Target,
        /// Number of body bytes received.
        bytes: u64,
        /// Time from task start to the last byte.
        #[serde(rename = "elapsed_ms", with = "duration_ms")]
        elapsed: Duration,
    },
    /// The retrieval failed; `elapsed` is measured up to the failure.
    Failure {
        target: Target,
        #[serde(rename = "elapsed_ms", with = "duration_ms")]
        elapsed: Duration,
        error: RetrievalError,
    },
}

impl Outcome {
    pub const fn success(target: Target, bytes: u64, elapsed: Duration) -> Self {
        Self::Success {
            target,
            bytes,
            elapsed,
        }
    }

    pub const fn failure(target: Target, elapsed: Duration, error: RetrievalError) -> Self {
        Self::Failure {
            target,
            elapsed,
            error,
        }
    }

    pub const fn target(&self) -> &Target {
        match self {
            Self::Success { target, .. } | Self::Failure { target, .. } => target,
        }
    }

    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Success { elapsed, .. } | Self::Failure { elapsed, .. } => *elapsed,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Bytes received, for successes.
    pub const fn bytes(&self) -> Option<u64> {
        match self {
            Self::Success { bytes, .. } => Some(*bytes),
            Self::Failure { .. } => None,
        }
    }

    pub const fn error(&self) -> Option<&RetrievalError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Human-readable failure cause, for failures.
    pub fn cause(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

/// A completion message as delivered on the dispatcher's channel.
///
/// `index` is the target's position in the submitted sequence, which lets
/// the collector restore submission order when asked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub index: usize,
    pub outcome: Outcome,
}

impl Completion {
    pub const fn new(index: usize, outcome: Outcome) -> Self {
        Self { index, outcome }
    }
}
