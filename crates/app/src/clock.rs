//! Time source for version tokens and retry backoff.

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use trolley::VersionToken;

/// Wall clock and sleeper.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time. Successive calls never return the same instant.
    fn now(&self) -> Timestamp;

    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);

    /// A fresh version token.
    fn version_token(&self) -> VersionToken {
        VersionToken::from_timestamp(self.now())
    }
}

/// System clock with strictly increasing readings.
#[derive(Debug)]
pub struct SystemClock {
    last: Mutex<Timestamp>,
}

impl SystemClock {
    /// Create a clock whose first reading is the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Timestamp::UNIX_EPOCH),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Timestamp::now();

        let Ok(mut last) = self.last.lock() else {
            return now;
        };

        let next = if now > *last {
            now
        } else {
            last.checked_add(SignedDuration::from_nanos(1))
                .unwrap_or(now)
        };

        *last = next;

        next
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
