#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod config;
mod error;
mod retriever;

// ============================================================================
// Public API
// ============================================================================

pub use config::HttpRetrieverConfig;
pub use error::HttpError;
pub use retriever::HttpRetriever;

// Silence unused dev-dependency warnings
#[cfg(test)]
use axum as _;
#[cfg(test)]
use fanfetch_dispatch as _;
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
