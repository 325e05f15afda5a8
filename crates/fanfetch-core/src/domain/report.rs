//! Aggregate report of a fan-out run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration_ms;
use super::{Completion, Outcome};

/// Order in which a report lists its outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// The order completion messages arrived in. Non-deterministic across runs.
    #[default]
    Arrival,
    /// The order targets were submitted in.
    Submission,
}

/// Read-only result of one run.
///
/// `results` holds exactly one outcome per submitted target. `total_elapsed`
/// is wall-clock time from dispatch to the last collected outcome, so with
/// concurrent tasks it is at least the slowest task and at most the sum of
/// all tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    results: Vec<Outcome>,
    #[serde(rename = "total_elapsed_ms", with = "duration_ms")]
    total_elapsed: Duration,
}

impl Report {
    pub const fn new(results: Vec<Outcome>, total_elapsed: Duration) -> Self {
        Self {
            results,
            total_elapsed,
        }
    }

    /// Build a report from collected completions, keeping arrival order or
    /// restoring submission order.
    pub fn from_completions(
        mut completions: Vec<Completion>,
        order: ResultOrder,
        total_elapsed: Duration,
    ) -> Self {
        if order == ResultOrder::Submission {
            completions.sort_by_key(|completion| completion.index);
        }
        Self::new(
            completions.into_iter().map(|c| c.outcome).collect(),
            total_elapsed,
        )
    }

    pub fn results(&self) -> &[Outcome] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Outcome> {
        self.results
    }

    pub const fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    pub const fn len(&self) -> usize {
        self.results.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &Outcome> {
        self.results.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.results.iter().filter(|o| !o.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Sum of bytes over all successes.
    pub fn total_bytes(&self) -> u64 {
        self.results.iter().filter_map(Outcome::bytes).sum()
    }

    /// Slowest individual task, or zero for an empty report.
    pub fn max_elapsed(&self) -> Duration {
        self.results
            .iter()
            .map(Outcome::elapsed)
            .max()
            .unwrap_or_default()
    }

    /// Sum of individual task durations.
    pub fn sum_elapsed(&self) -> Duration {
        self.results.iter().map(Outcome::elapsed).sum()
    }
}
