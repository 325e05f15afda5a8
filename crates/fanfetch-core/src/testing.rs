//! Scripted retriever for tests.
//!
//! Each target is given a delay and a response up front. Calls sleep on the
//! tokio clock, so tests running with a paused clock get deterministic
//! completion order.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Target;
use crate::error::RetrievalError;
use crate::ports::RetrieverPort;

/// What a scripted target does once its delay has elapsed.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return this many bytes.
    Bytes(u64),
    /// Fail with this error.
    Fail(RetrievalError),
    /// Panic with this message.
    Panic(String),
    /// Never complete.
    Hang,
}

#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    response: Scripted,
}

/// A retriever whose behaviour per target is scripted.
///
/// Unscripted targets fail with a transport error. Tracks how many calls were
/// made and the peak number of calls in flight at once.
#[derive(Debug, Default)]
pub struct ScriptedRetriever {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    seen: Mutex<Vec<Target>>,
}

impl ScriptedRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with `bytes` after `delay_ms`.
    #[must_use]
    pub fn ok(self, target: &str, bytes: u64, delay_ms: u64) -> Self {
        self.script(target, delay_ms, Scripted::Bytes(bytes))
    }

    /// Fail with a transport error carrying `cause` after `delay_ms`.
    #[must_use]
    pub fn fail(self, target: &str, cause: &str, delay_ms: u64) -> Self {
        self.script(target, delay_ms, Scripted::Fail(RetrievalError::transport(cause)))
    }

    /// Panic after `delay_ms`.
    #[must_use]
    pub fn panic(self, target: &str, delay_ms: u64) -> Self {
        self.script(
            target,
            delay_ms,
            Scripted::Panic(format!("scripted panic for {target}")),
        )
    }

    /// Never complete.
    #[must_use]
    pub fn hang(self, target: &str) -> Self {
        self.script(target, 0, Scripted::Hang)
    }

    #[must_use]
    pub fn script(mut self, target: &str, delay_ms: u64, response: Scripted) -> Self {
        self.scripts.insert(
            target.to_string(),
            Script {
                delay: Duration::from_millis(delay_ms),
                response,
            },
        );
        self
    }

    /// Number of `retrieve` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `retrieve` calls running right now.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of `retrieve` calls that were running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Targets in the order `retrieve` was called for them.
    pub fn seen(&self) -> Vec<Target> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

/// Decrements the in-flight counter however the call ends.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RetrieverPort for ScriptedRetriever {
    async fn retrieve(&self, target: &Target) -> Result<u64, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(target.clone());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let Some(script) = self.scripts.get(target.as_str()).cloned() else {
            return Err(RetrievalError::transport(format!("no script for {target}")));
        };

        tokio::time::sleep(script.delay).await;
        match script.response {
            Scripted::Bytes(bytes) => Ok(bytes),
            Scripted::Fail(error) => Err(error),
            Scripted::Panic(message) => panic!("{message}"),
            Scripted::Hang => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_scripted_responses() {
        let retriever = ScriptedRetriever::new()
            .ok("A", 100, 50)
            .fail("B", "connection refused", 10);

        let start = tokio::time::Instant::now();
        assert_eq!(retriever.retrieve(&Target::new("A")).await, Ok(100));
        assert!(start.elapsed() >= Duration::from_millis(50));

        let err = tokio_test::assert_err!(retriever.retrieve(&Target::new("B")).await);
        assert_eq!(err.to_string(), "connection refused");

        assert_eq!(retriever.calls(), 2);
        assert_eq!(retriever.peak_in_flight(), 1);
        assert_eq!(retriever.seen(), vec![Target::new("A"), Target::new("B")]);
    }

    #[tokio::test]
    async fn test_unscripted_target_fails() {
        let retriever = ScriptedRetriever::new();
        let err = tokio_test::assert_err!(retriever.retrieve(&Target::new("nope")).await);
        assert!(err.to_string().contains("no script for nope"));
    }
}
