//! Per-item update state machine.

use tokio::task::AbortHandle;
use trolley::Quantity;

/// A scheduled flush or refresh.
#[derive(Debug)]
pub(crate) struct Timer {
    pub id: u64,
    handle: AbortHandle,
}

impl Timer {
    pub(crate) fn new(id: u64, handle: AbortHandle) -> Self {
        Self { id, handle }
    }

    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

/// Update state of an item with outstanding work. Idle items have no entry.
#[derive(Debug)]
pub(crate) enum ItemPhase {
    /// An edit is waiting for its timer.
    Pending {
        quantity: Quantity,
        timer: Option<Timer>,
    },

    /// An update request is outstanding and nothing newer was requested.
    InFlight { sent: Quantity },

    /// An update request is outstanding and the user has asked for `quantity` since.
    PendingWhileInFlight {
        sent: Quantity,
        quantity: Quantity,
        timer: Option<Timer>,
    },
}

impl ItemPhase {
    /// Quantity the user currently sees.
    pub(crate) fn displayed(&self) -> Quantity {
        match self {
            Self::Pending { quantity, .. } | Self::PendingWhileInFlight { quantity, .. } => {
                *quantity
            }
            Self::InFlight { sent } => *sent,
        }
    }

    pub(crate) fn status(&self) -> ItemStatus {
        match self {
            Self::Pending { .. } => ItemStatus::Pending,
            Self::InFlight { .. } => ItemStatus::InFlight,
            Self::PendingWhileInFlight { .. } => ItemStatus::PendingWhileInFlight,
        }
    }

    /// Quantity of the outstanding update request, if one is running.
    pub(crate) fn sent(&self) -> Option<Quantity> {
        match self {
            Self::InFlight { sent } | Self::PendingWhileInFlight { sent, .. } => Some(*sent),
            Self::Pending { .. } => None,
        }
    }

    /// Remove the timer if it is the one identified by `id`.
    pub(crate) fn claim_timer(&mut self, id: u64) -> bool {
        let (Self::Pending { timer, .. } | Self::PendingWhileInFlight { timer, .. }) = self else {
            return false;
        };

        if timer.as_ref().is_some_and(|timer| timer.id == id) {
            *timer = None;

            return true;
        }

        false
    }

    /// Abort any scheduled timer and drop the state.
    pub(crate) fn cancel(self) {
        match self {
            Self::Pending { timer, .. } | Self::PendingWhileInFlight { timer, .. } => {
                if let Some(timer) = timer {
                    timer.cancel();
                }
            }
            Self::InFlight { .. } => {}
        }
    }
}

/// Public view of an item's update state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Nothing outstanding.
    Idle,

    /// An edit is waiting to be sent.
    Pending,

    /// An update request is outstanding.
    InFlight,

    /// An update request is outstanding and a newer edit is waiting behind it.
    PendingWhileInFlight,
}
