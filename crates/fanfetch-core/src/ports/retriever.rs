//! Retrieval port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Target;
use crate::error::RetrievalError;

/// Performs one retrieval for one target.
///
/// Implementations must fully drain (or measure) whatever they fetch and
/// release every resource they acquired before returning, on the error path
/// too. They return either a byte count or an error, never both.
///
/// Timing, cancellation and panic containment are handled by the caller.
#[async_trait]
pub trait RetrieverPort: Send + Sync {
    /// Retrieve `target` and return the number of bytes received.
    async fn retrieve(&self, target: &Target) -> Result<u64, RetrievalError>;
}

#[async_trait]
impl<T: RetrieverPort + ?Sized> RetrieverPort for Arc<T> {
    async fn retrieve(&self, target: &Target) -> Result<u64, RetrievalError> {
        (**self).retrieve(target).await
    }
}
