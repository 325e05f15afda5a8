//! Fan-out dispatcher.
//!
//! Spawns one task per target and hands back the receiving end of the
//! shared completion channel without waiting for any task.
//!
//! # Delivery contract
//!
//! Each task owns a [`CompletionGuard`]. Delivering an outcome consumes the
//! guard; a guard dropped without delivering (task aborted at runtime
//! shutdown, panic outside the retriever) sends a synthetic failure from its
//! `Drop`. The channel therefore carries exactly one message per target.
//!
//! Tasks run under a child of the caller's token. Dropping the
//! [`CompletionSource`] cancels that child, so abandoning a run stops its
//! outstanding retrievals instead of leaving them detached.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use fanfetch_core::{Completion, Outcome, RetrievalError, RetrieverPort, Target};

use crate::config::DispatchConfig;
use crate::task::perform;

/// Receiving end of a dispatch.
///
/// Yields one [`Completion`] per dispatched target, in arrival order.
/// Dropping it cancels every task that has not reported yet.
#[derive(Debug)]
pub struct CompletionSource {
    rx: mpsc::UnboundedReceiver<Completion>,
    expected: usize,
    _cancel_on_drop: DropGuard,
}

impl CompletionSource {
    /// Number of targets dispatched, which is the number of completions
    /// this source will yield.
    pub const fn expected(&self) -> usize {
        self.expected
    }

    /// Wait for the next completion.
    ///
    /// Returns `None` once every task has reported and the channel is closed.
    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}

/// Start one concurrent task per target.
///
/// Returns immediately. With [`Concurrency::Bounded`](crate::Concurrency)
/// tasks wait for a worker slot before calling the retriever; a task
/// cancelled while waiting reports a cancellation failure without ever
/// starting. Cancelling `cancel` or dropping the returned source cancels
/// the outstanding tasks.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn dispatch<R>(
    retriever: Arc<R>,
    targets: Vec<Target>,
    config: &DispatchConfig,
    cancel: &CancellationToken,
) -> CompletionSource
where
    R: RetrieverPort + ?Sized + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let expected = targets.len();
    let slots = config
        .concurrency()
        .limit()
        .map(|limit| Arc::new(Semaphore::new(limit.get())));
    let deadline = config.task_deadline();
    let run_token = cancel.child_token();

    debug!(
        targets = expected,
        concurrency = ?config.concurrency(),
        ?deadline,
        "dispatching"
    );

    for (index, target) in targets.into_iter().enumerate() {
        let guard = CompletionGuard::new(tx.clone(), index, target.clone());
        let retriever = Arc::clone(&retriever);
        let slots = slots.clone();
        let cancel = run_token.clone();

        tokio::spawn(async move {
            let _permit = match slots {
                Some(slots) => {
                    let Some(permit) = acquire_slot(slots, &cancel).await else {
                        debug!(index, "cancelled while waiting for a worker slot");
                        guard.deliver(Outcome::failure(
                            target,
                            Duration::ZERO,
                            RetrievalError::Cancelled,
                        ));
                        return;
                    };
                    Some(permit)
                }
                None => None,
            };

            let outcome = perform(retriever.as_ref(), target, &cancel, deadline).await;
            guard.deliver(outcome);
        });
    }

    CompletionSource {
        rx,
        expected,
        _cancel_on_drop: run_token.drop_guard(),
    }
}

/// Wait for a worker slot unless the run is cancelled first.
async fn acquire_slot(
    slots: Arc<Semaphore>,
    cancel: &CancellationToken,
) -> Option<OwnedSemaphorePermit> {
    tokio::select! {
        biased;

        () = cancel.cancelled() => None,

        permit = slots.acquire_owned() => permit.ok(),
    }
}

/// Owns a task's right to report; reports a failure if dropped unused.
struct CompletionGuard {
    tx: mpsc::UnboundedSender<Completion>,
    index: usize,
    target: Target,
    spawned_at: Instant,
    delivered: bool,
}

impl CompletionGuard {
    fn new(tx: mpsc::UnboundedSender<Completion>, index: usize, target: Target) -> Self {
        Self {
            tx,
            index,
            target,
            spawned_at: Instant::now(),
            delivered: false,
        }
    }

    fn deliver(mut self, outcome: Outcome) {
        self.delivered = true;
        self.send(outcome);
    }

    fn send(&self, outcome: Outcome) {
        if self.tx.send(Completion::new(self.index, outcome)).is_err() {
            // Collector is gone; nobody is waiting for this result.
            debug!(index = self.index, "completion dropped, receiver closed");
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.delivered {
            return;
        }
        warn!(
            index = self.index,
            target_id = %self.target,
            "task ended without reporting, delivering synthetic failure"
        );
        let outcome = Outcome::failure(
            self.target.clone(),
            self.spawned_at.elapsed(),
            RetrievalError::Panicked {
                message: "task ended without reporting an outcome".to_string(),
            },
        );
        self.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanfetch_core::testing::ScriptedRetriever;

    fn targets(names: &[&str]) -> Vec<Target> {
        names.iter().copied().map(Target::from).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_returns_before_tasks_complete() {
        let retriever = Arc::new(ScriptedRetriever::new().ok("slow", 1, 1_000));
        let mut source = dispatch(
            retriever,
            targets(&["slow"]),
            &DispatchConfig::new(),
            &CancellationToken::new(),
        );

        assert_eq!(source.expected(), 1);
        assert!(source.rx.try_recv().is_err());

        let completion = source.next().await.unwrap();
        assert_eq!(completion.index, 0);
        assert!(source.next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_guard_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(CompletionGuard::new(tx, 3, Target::new("lost")));

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.index, 3);
        assert_eq!(completion.outcome.target().as_str(), "lost");
        assert!(matches!(
            completion.outcome.error(),
            Some(RetrievalError::Panicked { .. })
        ));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_delivered_guard_sends_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let guard = CompletionGuard::new(tx, 0, Target::new("A"));
        guard.deliver(Outcome::success(Target::new("A"), 5, Duration::ZERO));

        assert_eq!(rx.recv().await.unwrap().outcome.bytes(), Some(5));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_source_cancels_outstanding_tasks() {
        let retriever = Arc::new(ScriptedRetriever::new().hang("a").hang("b"));
        let caller = CancellationToken::new();
        let source = dispatch(
            Arc::clone(&retriever),
            targets(&["a", "b"]),
            &DispatchConfig::new(),
            &caller,
        );

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(retriever.in_flight(), 2);

        drop(source);
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(retriever.in_flight(), 0);
        assert!(!caller.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_dispatch_caps_in_flight() {
        let retriever = Arc::new(
            ScriptedRetriever::new()
                .ok("a", 1, 10)
                .ok("b", 1, 10)
                .ok("c", 1, 10)
                .ok("d", 1, 10)
                .ok("e", 1, 10),
        );
        let mut source = dispatch(
            Arc::clone(&retriever),
            targets(&["a", "b", "c", "d", "e"]),
            &DispatchConfig::new().with_max_in_flight(2),
            &CancellationToken::new(),
        );

        let mut received = 0;
        while source.next().await.is_some() {
            received += 1;
        }

        assert_eq!(received, 5);
        assert_eq!(retriever.calls(), 5);
        assert_eq!(retriever.peak_in_flight(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting_for_slot_never_starts_task() {
        let retriever = Arc::new(ScriptedRetriever::new().hang("busy").ok("queued", 1, 0));
        let cancel = CancellationToken::new();
        let mut source = dispatch(
            Arc::clone(&retriever),
            targets(&["busy", "queued"]),
            &DispatchConfig::new().with_max_in_flight(1),
            &cancel,
        );

        tokio::time::sleep(Duration::from_millis(5)).await;
        cancel.cancel();

        let mut outcomes = Vec::new();
        while let Some(completion) = source.next().await {
            outcomes.push(completion.outcome);
        }

        assert_eq!(outcomes.len(), 2);
        assert!(
            outcomes
                .iter()
                .all(|o| o.error().is_some_and(RetrievalError::is_cancelled))
        );
        assert_eq!(retriever.seen(), vec![Target::new("busy")]);
    }
}
