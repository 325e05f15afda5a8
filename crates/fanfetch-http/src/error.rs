//! Errors raised while setting up the HTTP retriever.
//!
//! Per-request failures are not errors here; they are mapped to
//! `RetrievalError` at the port boundary.

use thiserror::Error;

/// Errors related to constructing an [`HttpRetriever`](crate::HttpRetriever).
#[derive(Debug, Error)]
pub enum HttpError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
