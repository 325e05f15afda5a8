//! `fetchall`: fetch URLs in parallel and report their times and sizes.
//!
//! The binary in `main.rs` is the composition root; everything it wires
//! together lives here so it can be tested.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use dotenvy as _;

// Silence unused dev-dependency warnings
#[cfg(test)]
use fanfetch_core as _;
#[cfg(test)]
use tokio_test as _;

pub mod bootstrap;
pub mod error;
pub mod fetch;
pub mod interrupt;
pub mod logging;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use error::CliError;
pub use fetch::OutputFormat;
pub use parser::{Cli, OrderArg};
