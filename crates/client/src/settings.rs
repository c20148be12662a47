//! Coalescer timing.

use std::time::Duration;

/// Delays used by a [`CartSession`](crate::CartSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalescerSettings {
    /// Quiet period after the last quantity edit before it is sent.
    pub debounce: Duration,

    /// Delay before retrying a flush that found the item's previous request still running.
    pub busy_retry: Duration,

    /// Quiet period after the last add or delete before the cart is re-fetched.
    pub refresh_debounce: Duration,
}

impl Default for CoalescerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            busy_retry: Duration::from_millis(200),
            refresh_debounce: Duration::from_millis(300),
        }
    }
}
