//! Bounded retry with exponential backoff.

use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};

/// Longest delay between two attempts.
const MAX_DELAY: Duration = Duration::from_secs(5);

/// Retry budget for optimistic read-compute-write loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Delays to wait between attempts, one fewer than [`Self::max_attempts`].
    ///
    /// The iterator runs dry after the last retry, so no sleep follows the final attempt.
    #[must_use]
    pub fn backoff(&self) -> ExponentialBackoff {
        let retries = usize::try_from(self.max_attempts.saturating_sub(1)).unwrap_or(usize::MAX);

        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.base_delay.max(MAX_DELAY))
            .with_factor(2.0)
            .with_max_times(retries)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delays_double() {
        let delays: Vec<_> = RetryPolicy::default().backoff().collect();

        assert_eq!(
            delays,
            [Duration::from_millis(50), Duration::from_millis(100)]
        );
    }

    #[test]
    fn single_attempt_never_sleeps() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };

        assert_eq!(policy.backoff().next(), None);
    }

    #[test]
    fn delays_are_capped() {
        let policy = RetryPolicy {
            max_attempts: u32::MAX,
            base_delay: Duration::from_secs(1),
        };

        assert_eq!(policy.backoff().nth(40), Some(MAX_DELAY));
    }
}
