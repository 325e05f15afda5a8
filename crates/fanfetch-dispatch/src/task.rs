//! Retrieval task.
//!
//! Runs one retrieval for one target and turns whatever happens into an
//! [`Outcome`]. Nothing escapes: transport errors, deadlines, cancellation
//! and panics inside the retriever all become failures with the elapsed time
//! measured up to the point of failure.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use fanfetch_core::{Outcome, RetrievalError, RetrieverPort, Target};

/// Perform one retrieval and report its outcome.
///
/// The token is checked before the retrieval starts and raced against it
/// while it runs. The optional deadline bounds the retrieval itself.
pub async fn perform<R>(
    retriever: &R,
    target: Target,
    cancel: &CancellationToken,
    deadline: Option<Duration>,
) -> Outcome
where
    R: RetrieverPort + ?Sized,
{
    let started = Instant::now();

    if cancel.is_cancelled() {
        debug!(target_id = %target, "skipping retrieval, run already cancelled");
        return Outcome::failure(target, Duration::ZERO, RetrievalError::Cancelled);
    }

    debug!(target_id = %target, "retrieval started");

    let result = tokio::select! {
        biased;

        () = cancel.cancelled() => Err(RetrievalError::Cancelled),

        result = with_deadline(
            AssertUnwindSafe(retriever.retrieve(&target)).catch_unwind(),
            deadline,
        ) => result,
    };

    let elapsed = started.elapsed();
    match result {
        Ok(bytes) => {
            debug!(target_id = %target, bytes, ?elapsed, "retrieval succeeded");
            Outcome::success(target, bytes, elapsed)
        }
        Err(error) => {
            warn!(target_id = %target, ?elapsed, error = %error, "retrieval failed");
            Outcome::failure(target, elapsed, error)
        }
    }
}

async fn with_deadline<F>(attempt: F, deadline: Option<Duration>) -> Result<u64, RetrievalError>
where
    F: Future<Output = Result<Result<u64, RetrievalError>, Box<dyn Any + Send>>>,
{
    let caught = match deadline {
        Some(limit) => match tokio::time::timeout(limit, attempt).await {
            Ok(caught) => caught,
            Err(_) => return Err(RetrievalError::timed_out(limit)),
        },
        None => attempt.await,
    };
    caught.unwrap_or_else(|payload| Err(RetrievalError::panicked(payload.as_ref())))
}
