//! Dispatch configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use fanfetch_core::ResultOrder;

/// How many retrievals may run at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Concurrency {
    /// One concurrent task per target, all started immediately.
    #[default]
    Unbounded,
    /// At most this many retrievals in flight; the rest wait for a slot.
    Bounded(NonZeroUsize),
}

impl Concurrency {
    /// Build from an optional limit, where `None` and `0` mean unbounded.
    pub fn from_limit(limit: Option<usize>) -> Self {
        limit
            .and_then(NonZeroUsize::new)
            .map_or(Self::Unbounded, Self::Bounded)
    }

    pub const fn limit(self) -> Option<NonZeroUsize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(limit) => Some(limit),
        }
    }
}

/// Configuration for a fan-out run.
///
/// # Example
///
/// ```
/// use fanfetch_dispatch::{DispatchConfig, ResultOrder};
/// use std::time::Duration;
///
/// let config = DispatchConfig::new()
///     .with_max_in_flight(16)
///     .with_task_deadline(Duration::from_secs(10))
///     .with_order(ResultOrder::Submission);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    pub(crate) concurrency: Concurrency,
    pub(crate) task_deadline: Option<Duration>,
    pub(crate) order: ResultOrder,
}

impl DispatchConfig {
    /// Unbounded fan-out, no deadline, arrival order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Bound the number of retrievals in flight. `0` means unbounded.
    #[must_use]
    pub fn with_max_in_flight(self, limit: usize) -> Self {
        self.with_concurrency(Concurrency::from_limit(Some(limit)))
    }

    /// Fail any retrieval still running after `deadline`.
    #[must_use]
    pub const fn with_task_deadline(mut self, deadline: Duration) -> Self {
        self.task_deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn with_optional_task_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.task_deadline = deadline;
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: ResultOrder) -> Self {
        self.order = order;
        self
    }

    pub const fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    pub const fn task_deadline(&self) -> Option<Duration> {
        self.task_deadline
    }

    pub const fn order(&self) -> ResultOrder {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::new();
        assert_eq!(config.concurrency(), Concurrency::Unbounded);
        assert!(config.task_deadline().is_none());
        assert_eq!(config.order(), ResultOrder::Arrival);
    }

    #[test]
    fn test_builder_pattern() {
        let config = DispatchConfig::new()
            .with_max_in_flight(4)
            .with_task_deadline(Duration::from_millis(250))
            .with_order(ResultOrder::Submission);

        assert_eq!(config.concurrency().limit(), NonZeroUsize::new(4));
        assert_eq!(config.task_deadline(), Some(Duration::from_millis(250)));
        assert_eq!(config.order(), ResultOrder::Submission);
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        assert_eq!(Concurrency::from_limit(Some(0)), Concurrency::Unbounded);
        assert_eq!(Concurrency::from_limit(None), Concurrency::Unbounded);
        assert_eq!(
            DispatchConfig::new().with_max_in_flight(0).concurrency(),
            Concurrency::Unbounded
        );
    }
}
