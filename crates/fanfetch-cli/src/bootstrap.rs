//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the HTTP retriever and the fan-out
//! engine are wired together for the CLI.

use std::sync::Arc;
use std::time::Duration;

use fanfetch_dispatch::{Concurrency, DispatchConfig, FanOut};
use fanfetch_http::{HttpRetriever, HttpRetrieverConfig};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Fan-out behaviour (concurrency, deadline, ordering).
    pub dispatch: DispatchConfig,
    /// HTTP client behaviour.
    pub http: HttpRetrieverConfig,
}

impl CliConfig {
    /// Derive the configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        let dispatch = DispatchConfig::new()
            .with_concurrency(Concurrency::from_limit(cli.concurrency))
            .with_optional_task_deadline(cli.deadline_ms.map(Duration::from_millis))
            .with_order(cli.order.into());

        let http = HttpRetrieverConfig::new().with_error_for_status(cli.fail_on_status);
        let http = if cli.timeout_secs == 0 {
            http.without_timeout()
        } else {
            http.with_timeout(Duration::from_secs(cli.timeout_secs))
        };

        Self { dispatch, http }
    }
}

/// Fully composed context for the fetch command.
pub struct CliContext {
    fan_out: FanOut<HttpRetriever>,
}

impl CliContext {
    pub const fn fan_out(&self) -> &FanOut<HttpRetriever> {
        &self.fan_out
    }
}

/// Build the CLI context from configuration.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    debug!(?config, "bootstrapping fetchall");
    let retriever = HttpRetriever::new(&config.http)?;
    Ok(CliContext {
        fan_out: FanOut::new(Arc::new(retriever), config.dispatch),
    })
}
