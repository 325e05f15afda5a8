//! Aggregate reporter.
//!
//! Times a whole run: dispatch, collect exactly one completion per target,
//! then build the [`Report`].

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use fanfetch_core::{Report, RetrieverPort, Target};

use crate::collector::collect;
use crate::config::DispatchConfig;
use crate::dispatcher::dispatch;
use crate::error::DispatchError;

/// A configured fan-out over one retriever.
///
/// Cheap to share; every `run` is independent and produces its own report.
pub struct FanOut<R: RetrieverPort + ?Sized> {
    retriever: Arc<R>,
    config: DispatchConfig,
}

impl<R: RetrieverPort + ?Sized + 'static> FanOut<R> {
    pub const fn new(retriever: Arc<R>, config: DispatchConfig) -> Self {
        Self { retriever, config }
    }

    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Retrieve every target concurrently and report the outcomes.
    ///
    /// Always yields one outcome per target; failed retrievals are failure
    /// entries, not missing ones.
    pub async fn run<I, T>(&self, targets: I) -> Result<Report, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        self.run_with_cancel(targets, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but `cancel` fails every task that has not
    /// finished yet with a cancellation outcome.
    ///
    /// Dropping the returned future cancels the run's outstanding tasks
    /// without cancelling `cancel` itself.
    pub async fn run_with_cancel<I, T>(
        &self,
        targets: I,
        cancel: CancellationToken,
    ) -> Result<Report, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let targets: Vec<Target> = targets.into_iter().map(Into::into).collect();
        let count = targets.len();

        let start = Instant::now();
        let mut source = dispatch(Arc::clone(&self.retriever), targets, &self.config, &cancel);
        let completions = collect(&mut source, count).await?;
        let total_elapsed = start.elapsed();

        let report = Report::from_completions(completions, self.config.order(), total_elapsed);
        info!(
            targets = count,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            bytes = report.total_bytes(),
            ?total_elapsed,
            "fan-out run complete"
        );
        Ok(report)
    }
}

/// Run `targets` through `retriever` with the default configuration:
/// unbounded fan-out, no deadline, arrival order.
pub async fn run<R, I, T>(retriever: Arc<R>, targets: I) -> Result<Report, DispatchError>
where
    R: RetrieverPort + ?Sized + 'static,
    I: IntoIterator<Item = T>,
    T: Into<Target>,
{
    FanOut::new(retriever, DispatchConfig::new())
        .run(targets)
        .await
}
