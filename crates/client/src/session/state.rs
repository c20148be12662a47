//! Session state guarded by the session mutex.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use trolley::{Cart, CartItem, CartItemUuid, CartView, ProductUuid, Quantity, Totals};

use crate::{
    errors::ClientError,
    session::phase::{ItemPhase, Timer},
};

/// An optimistically deleted item.
#[derive(Debug)]
pub(crate) struct Tombstone {
    /// The removed item, kept for rollback.
    item: CartItem,

    /// Position the item had in the list.
    index: usize,

    /// Refresh sequence number current when the server confirmed the delete.
    confirmed_after: Option<u64>,

    /// Quantity of an update request still outstanding for the item.
    in_flight: Option<Quantity>,
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub generation: u64,
    pub cart: Option<Cart>,
    /// Items with their last server-confirmed quantities.
    pub items: Vec<CartItem>,
    pub phases: HashMap<CartItemUuid, ItemPhase>,
    pub adding: HashSet<ProductUuid>,
    pub tombstones: HashMap<CartItemUuid, Tombstone>,
    pub refresh_issued: u64,
    pub refresh_applied: u64,
    pub refresh_timer: Option<Timer>,
    pub last_error: Option<ClientError>,
    next_timer: u64,
}

impl State {
    pub(crate) fn next_timer_id(&mut self) -> u64 {
        self.next_timer += 1;

        self.next_timer
    }

    pub(crate) fn item(&self, id: CartItemUuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn displayed_quantity(&self, id: CartItemUuid) -> Option<Quantity> {
        let item = self.item(id)?;

        Some(
            self.phases
                .get(&id)
                .map_or(item.quantity, ItemPhase::displayed),
        )
    }

    /// Items as the user should see them, pending edits applied.
    pub(crate) fn displayed_items(&self) -> Vec<CartItem> {
        self.items
            .iter()
            .map(|item| CartItem {
                quantity: self
                    .phases
                    .get(&item.id)
                    .map_or(item.quantity, ItemPhase::displayed),
                ..item.clone()
            })
            .collect()
    }

    pub(crate) fn totals(&self) -> Totals {
        Totals::from_items(&self.displayed_items())
    }

    /// Record the quantity the server stored for an item.
    pub(crate) fn confirm_quantity(&mut self, id: CartItemUuid, quantity: Quantity) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        } else if let Some(tombstone) = self.tombstones.get_mut(&id) {
            tombstone.item.quantity = quantity;
        }
    }

    /// The update request of a buried item has finished.
    pub(crate) fn settle_buried_update(&mut self, id: CartItemUuid) {
        if let Some(tombstone) = self.tombstones.get_mut(&id) {
            tombstone.in_flight = None;
        }
    }

    /// The server has (re)created `id`; reads listing it are no longer stale.
    pub(crate) fn forget_tombstone(&mut self, id: CartItemUuid) {
        if self.tombstones.remove(&id).is_some() {
            debug!(item_id = %id, "item re-added, no longer filtered");
        }
    }

    pub(crate) fn claim_item_timer(&mut self, item: CartItemUuid, timer: u64) -> bool {
        self.phases
            .get_mut(&item)
            .is_some_and(|phase| phase.claim_timer(timer))
    }

    pub(crate) fn claim_refresh_timer(&mut self, timer: u64) -> bool {
        if self.refresh_timer.as_ref().is_some_and(|t| t.id == timer) {
            self.refresh_timer = None;

            return true;
        }

        false
    }

    /// Apply a fetched cart. Responses older than the last applied one are dropped.
    pub(crate) fn apply_view(&mut self, view: Option<CartView>, sequence: u64) -> bool {
        if sequence <= self.refresh_applied {
            debug!(sequence, applied = self.refresh_applied, "dropping stale cart response");

            return false;
        }

        self.refresh_applied = sequence;

        let (cart, items) = match view {
            Some(view) => (Some(view.cart), view.items),
            None => (None, Vec::new()),
        };

        let listed: HashSet<CartItemUuid> = items.iter().map(|item| item.id).collect();

        // A delete is settled once a read issued after its confirmation no longer lists it.
        self.tombstones.retain(|id, tombstone| {
            !tombstone
                .confirmed_after
                .is_some_and(|confirmed| sequence > confirmed && !listed.contains(id))
        });

        let tombstones = &self.tombstones;

        self.items = items
            .into_iter()
            .filter(|item| !tombstones.contains_key(&item.id))
            .collect();
        self.cart = cart;

        true
    }

    /// Remove an item locally and remember it for filtering and rollback.
    pub(crate) fn bury(&mut self, id: CartItemUuid) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };

        let item = self.items.remove(index);

        let in_flight = self.phases.remove(&id).and_then(|phase| {
            let sent = phase.sent();

            phase.cancel();

            sent
        });

        self.tombstones.insert(
            id,
            Tombstone {
                item,
                index,
                confirmed_after: None,
                in_flight,
            },
        );

        true
    }

    pub(crate) fn confirm_tombstone(&mut self, id: CartItemUuid) {
        let issued = self.refresh_issued;

        if let Some(tombstone) = self.tombstones.get_mut(&id) {
            tombstone.confirmed_after = Some(issued);
        }
    }

    /// Put a buried item back where it was.
    pub(crate) fn resurrect(&mut self, id: CartItemUuid) {
        let Some(tombstone) = self.tombstones.remove(&id) else {
            return;
        };

        if self.item(id).is_some() {
            return;
        }

        let index = tombstone.index.min(self.items.len());

        self.items.insert(index, tombstone.item);

        if let Some(sent) = tombstone.in_flight {
            self.phases.insert(id, ItemPhase::InFlight { sent });
        }
    }

    /// Abort every scheduled timer.
    pub(crate) fn cancel_timers(self) {
        for phase in self.phases.into_values() {
            phase.cancel();
        }

        if let Some(timer) = self.refresh_timer {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{session::phase::ItemStatus, test::make_view};

    use super::*;

    #[test]
    fn stale_responses_are_dropped() -> TestResult {
        let mut state = State::default();
        let newer = make_view(&[(2, 10_00)])?;
        let older = make_view(&[(1, 10_00), (1, 5_00)])?;

        assert!(state.apply_view(Some(newer.clone()), 2));
        assert!(!state.apply_view(Some(older), 1));

        assert_eq!(state.items, newer.items);

        Ok(())
    }

    #[test]
    fn tombstones_filter_until_a_later_read_omits_the_item() -> TestResult {
        let mut state = State::default();
        let view = make_view(&[(1, 1_00), (2, 2_00)])?;
        let removed = view.items.first().map(|item| item.id).ok_or("no items")?;

        state.refresh_issued = 1;
        state.apply_view(Some(view.clone()), 1);

        assert!(state.bury(removed));

        // Issued before the delete was confirmed: still lists the item.
        state.refresh_issued = 2;
        state.apply_view(Some(view.clone()), 2);

        assert!(state.item(removed).is_none());

        state.confirm_tombstone(removed);

        // Issued after confirmation but served by a lagging replica.
        state.refresh_issued = 3;
        state.apply_view(Some(view.clone()), 3);

        assert!(state.item(removed).is_none());
        assert!(state.tombstones.contains_key(&removed));

        let mut settled = view;
        settled.items.retain(|item| item.id != removed);

        state.refresh_issued = 4;
        state.apply_view(Some(settled), 4);

        assert!(state.tombstones.is_empty());

        Ok(())
    }

    #[test]
    fn resurrect_restores_position() -> TestResult {
        let mut state = State::default();
        let view = make_view(&[(1, 1_00), (2, 2_00), (3, 3_00)])?;
        let middle = view.items.get(1).map(|item| item.id).ok_or("no items")?;

        state.apply_view(Some(view.clone()), 1);
        state.bury(middle);
        state.resurrect(middle);

        assert_eq!(state.items, view.items);
        assert!(state.tombstones.is_empty());

        Ok(())
    }

    #[test]
    fn resurrect_keeps_an_outstanding_update() -> TestResult {
        let mut state = State::default();
        let view = make_view(&[(1, 1_00)])?;
        let id = view.items.first().map(|item| item.id).ok_or("no items")?;
        let sent = Quantity::new(3)?;

        state.apply_view(Some(view), 1);
        state.phases.insert(id, ItemPhase::InFlight { sent });

        assert!(state.bury(id));
        state.resurrect(id);

        assert_eq!(
            state.phases.get(&id).map(ItemPhase::status),
            Some(ItemStatus::InFlight)
        );

        assert!(state.bury(id));
        state.confirm_quantity(id, sent);
        state.settle_buried_update(id);
        state.resurrect(id);

        assert!(state.phases.get(&id).is_none());
        assert_eq!(state.item(id).map(|item| item.quantity), Some(sent));

        Ok(())
    }

    #[test]
    fn readded_items_are_listed_again() -> TestResult {
        let mut state = State::default();
        let view = make_view(&[(1, 1_00)])?;
        let id = view.items.first().map(|item| item.id).ok_or("no items")?;

        state.refresh_issued = 1;
        state.apply_view(Some(view.clone()), 1);
        assert!(state.bury(id));
        state.confirm_tombstone(id);
        state.forget_tombstone(id);

        state.refresh_issued = 2;
        state.apply_view(Some(view), 2);

        assert!(state.item(id).is_some());
        assert!(state.tombstones.is_empty());

        Ok(())
    }

    #[test]
    fn totals_use_displayed_quantities() -> TestResult {
        let mut state = State::default();
        let view = make_view(&[(2, 10_00)])?;
        let id = view.items.first().map(|item| item.id).ok_or("no items")?;

        state.apply_view(Some(view), 1);
        state.phases.insert(
            id,
            ItemPhase::Pending {
                quantity: Quantity::new(7)?,
                timer: None,
            },
        );

        assert_eq!(
            state.totals(),
            Totals {
                total_items: 7,
                total_price: 70_00
            }
        );

        Ok(())
    }
}
