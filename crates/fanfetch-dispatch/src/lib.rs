#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod blocking;
mod collector;
mod config;
mod dispatcher;
mod error;
mod reporter;
mod task;

// ============================================================================
// Public API
// ============================================================================

pub use blocking::BlockingRetriever;
pub use collector::collect;
pub use config::{Concurrency, DispatchConfig};
pub use dispatcher::{CompletionSource, dispatch};
pub use error::DispatchError;
pub use reporter::{FanOut, run};
pub use task::perform;

// Re-export core types for convenience
pub use fanfetch_core::{
    Completion, Outcome, Report, ResultOrder, RetrievalError, RetrieverPort, Target,
};

// Cancellation token accepted by `FanOut::run_with_cancel` and `dispatch`
pub use tokio_util::sync::CancellationToken;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
