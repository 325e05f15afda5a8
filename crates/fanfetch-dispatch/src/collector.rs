//! Completion collector.

use tracing::{trace, warn};

use fanfetch_core::Completion;

use crate::dispatcher::CompletionSource;
use crate::error::DispatchError;

/// Read exactly `count` completions, in the order they arrive.
///
/// The n-th completion received is at position n of the output, whichever
/// target it belongs to. If the channel closes early the delivery contract
/// was broken and [`DispatchError::Incomplete`] is returned instead of
/// waiting forever.
pub async fn collect(
    source: &mut CompletionSource,
    count: usize,
) -> Result<Vec<Completion>, DispatchError> {
    let mut completions = Vec::with_capacity(count);

    while completions.len() < count {
        let Some(completion) = source.next().await else {
            warn!(
                expected = count,
                received = completions.len(),
                "completion channel closed early"
            );
            return Err(DispatchError::Incomplete {
                expected: count,
                received: completions.len(),
            });
        };
        trace!(
            position = completions.len(),
            index = completion.index,
            success = completion.outcome.is_success(),
            "completion received"
        );
        completions.push(completion);
    }

    Ok(completions)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::DispatchConfig;
    use crate::dispatcher::dispatch;
    use fanfetch_core::Target;
    use fanfetch_core::testing::ScriptedRetriever;
    use tokio_util::sync::CancellationToken;

    #[tokio::test(start_paused = true)]
    async fn test_collects_in_arrival_order() {
        let retriever = Arc::new(
            ScriptedRetriever::new()
                .ok("slow", 1, 30)
                .ok("fast", 2, 10)
                .ok("middle", 3, 20),
        );
        let mut source = dispatch(
            retriever,
            vec![Target::new("slow"), Target::new("fast"), Target::new("middle")],
            &DispatchConfig::new(),
            &CancellationToken::new(),
        );

        let completions = collect(&mut source, 3).await.unwrap();
        let indices: Vec<usize> = completions.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[tokio::test]
    async fn test_zero_count_returns_immediately() {
        let mut source = dispatch(
            Arc::new(ScriptedRetriever::new()),
            Vec::new(),
            &DispatchConfig::new(),
            &CancellationToken::new(),
        );
        assert!(collect(&mut source, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_early_close_is_reported() {
        let mut source = dispatch(
            Arc::new(ScriptedRetriever::new().ok("A", 1, 0)),
            vec![Target::new("A")],
            &DispatchConfig::new(),
            &CancellationToken::new(),
        );

        let result = collect(&mut source, 2).await;
        assert_eq!(
            result,
            Err(DispatchError::Incomplete {
                expected: 2,
                received: 1
            })
        );
    }
}
