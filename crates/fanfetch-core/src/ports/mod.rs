//! Port definitions (trait abstractions).
//!
//! Ports are the seams between the orchestrator and the outside world.
//! Adapters (HTTP, blocking functions, test scripts) implement them.

mod retriever;

pub use retriever::RetrieverPort;
