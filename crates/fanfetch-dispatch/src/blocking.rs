//! Adapter for blocking retrieval functions.

use std::sync::Arc;

use async_trait::async_trait;

use fanfetch_core::{RetrievalError, RetrieverPort, Target};

/// Wraps a blocking `Fn(&Target) -> Result<u64, RetrievalError>` so it can
/// be dispatched like any other retriever.
///
/// Each call runs on tokio's blocking thread pool. A blocking call cannot be
/// interrupted: when its task is cancelled or times out the outcome is
/// reported immediately and the call finishes in the background.
pub struct BlockingRetriever<F> {
    func: Arc<F>,
}

impl<F> BlockingRetriever<F>
where
    F: Fn(&Target) -> Result<u64, RetrievalError> + Send + Sync + 'static,
{
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl<F> RetrieverPort for BlockingRetriever<F>
where
    F: Fn(&Target) -> Result<u64, RetrievalError> + Send + Sync + 'static,
{
    async fn retrieve(&self, target: &Target) -> Result<u64, RetrievalError> {
        let func = Arc::clone(&self.func);
        let target = target.clone();

        match tokio::task::spawn_blocking(move || func(&target)).await {
            Ok(result) => result,
            Err(join_error) if join_error.is_panic() => {
                Err(RetrievalError::panicked(join_error.into_panic().as_ref()))
            }
            Err(join_error) => Err(RetrievalError::transport(join_error.to_string())),
        }
    }
}
