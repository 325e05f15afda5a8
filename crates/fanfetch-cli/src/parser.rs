//! Main CLI parser and argument handling.

use clap::{Parser, ValueEnum};

use fanfetch_dispatch::ResultOrder;

/// Command-line interface for fetching many URLs at once.
///
/// Every URL is fetched concurrently; one line is printed per URL, then the
/// wall-clock time of the whole run.
#[derive(Parser, Debug)]
#[command(name = "fetchall")]
#[command(about = "Fetch URLs in parallel and report their times and sizes")]
#[command(version)]
pub struct Cli {
    /// URLs to fetch
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Maximum number of requests in flight (0 or unset: no limit)
    #[arg(short = 'c', long, env = "FANFETCH_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Fail any fetch still running after this many milliseconds
    #[arg(long = "deadline-ms", env = "FANFETCH_DEADLINE_MS")]
    pub deadline_ms: Option<u64>,

    /// HTTP request timeout in seconds (0 disables it)
    #[arg(long = "timeout-secs", env = "FANFETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Count non-2xx responses as failures
    #[arg(long)]
    pub fail_on_status: bool,

    /// Order in which results are printed
    #[arg(long, value_enum, default_value_t = OrderArg::Arrival)]
    pub order: OrderArg,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Result ordering as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// As each fetch completes
    Arrival,
    /// As the URLs were given
    Submission,
}

impl From<OrderArg> for ResultOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Arrival => Self::Arrival,
            OrderArg::Submission => Self::Submission,
        }
    }
}
