//! Cart session: the client-side mutation coalescer.
//!
//! A [`CartSession`] keeps a local copy of the user's cart and mediates every mutation:
//!
//! - Quantity edits are shown immediately and sent after a quiet period. Each item has at most
//!   one update request outstanding; edits made while one is running are queued behind it and
//!   only the latest value is sent.
//! - Adding a product is guarded so a second add of the same product is refused while the first
//!   is still running.
//! - Deletes are applied locally first. Deleted items stay filtered out of fetched carts until a
//!   fetch issued after the server confirmed the delete no longer lists them.
//!
//! Timers run on the Tokio runtime. Every timer carries an id and only acts if it is still the
//! one registered for its item when it fires.

mod phase;
mod state;

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::sleep;
use tracing::{debug, warn};
use trolley::{Cart, CartItem, CartItemUuid, ProductUuid, Quantity, Totals};

pub use phase::ItemStatus;

use crate::{api::CartApi, errors::ClientError, settings::CoalescerSettings};

use self::{
    phase::{ItemPhase, Timer},
    state::State,
};

/// Result of [`CartSession::add_to_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The server stored the item under this id.
    Added(CartItemUuid),

    /// An add of the same product is still running; nothing was sent.
    AlreadyInProgress,
}

/// Local cart state plus the machinery that keeps it in step with the server.
///
/// Cloning is cheap and every clone drives the same session.
#[derive(Clone)]
pub struct CartSession {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn CartApi>,
    settings: CoalescerSettings,
    state: Mutex<State>,
}

impl CartSession {
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, settings: CoalescerSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                state: Mutex::new(State::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The loaded cart header as last fetched.
    pub fn cart(&self) -> Option<Cart> {
        self.state().cart.clone()
    }

    /// Items as displayed: pending edits applied, deleted items removed.
    pub fn items(&self) -> Vec<CartItem> {
        self.state().displayed_items()
    }

    /// Displayed quantity of an item.
    pub fn quantity_of(&self, item: CartItemUuid) -> Option<Quantity> {
        self.state().displayed_quantity(item)
    }

    /// Totals of the displayed items.
    pub fn totals(&self) -> Totals {
        self.state().totals()
    }

    /// Where `item` is in its update cycle.
    pub fn item_status(&self, item: CartItemUuid) -> ItemStatus {
        self.state()
            .phases
            .get(&item)
            .map_or(ItemStatus::Idle, ItemPhase::status)
    }

    /// Whether an add of `product` is running.
    pub fn is_adding(&self, product: ProductUuid) -> bool {
        self.state().adding.contains(&product)
    }

    /// Whether `item` was deleted locally and is still being filtered from fetched carts.
    pub fn is_deleting(&self, item: CartItemUuid) -> bool {
        self.state().tombstones.contains_key(&item)
    }

    /// The most recent failure of a background or optimistic operation.
    pub fn last_error(&self) -> Option<ClientError> {
        self.state().last_error.clone()
    }

    /// Take the most recent failure, clearing it.
    pub fn take_error(&self) -> Option<ClientError> {
        self.state().last_error.take()
    }

    /// Fetch the cart for the first time.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch.
    pub async fn load(&self) -> Result<(), ClientError> {
        self.refresh().await
    }

    /// Re-fetch the cart. A response is dropped when a later-issued fetch was already applied.
    ///
    /// # Errors
    ///
    /// Returns the error of the fetch, which is also kept as the last error.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let (sequence, generation) = {
            let mut state = self.state();

            state.refresh_issued += 1;

            (state.refresh_issued, state.generation)
        };

        let result = self.inner.api.fetch_cart().await;

        let mut state = self.state();

        if state.generation != generation {
            return Ok(());
        }

        match result {
            Ok(view) => {
                state.apply_view(view, sequence);

                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to fetch cart");

                state.last_error = Some(error.clone());

                Err(error)
            }
        }
    }

    /// Record a new quantity for `item` and schedule sending it.
    ///
    /// The value is clamped into the allowed range and returned.
    ///
    /// # Errors
    ///
    /// [`ClientError::UnknownItem`] when the item is not displayed.
    pub fn request_quantity_change(
        &self,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<Quantity, ClientError> {
        let quantity = Quantity::clamped(quantity);
        let delay = self.inner.settings.debounce;
        let mut state = self.state();

        if state.item(item).is_none() {
            return Err(ClientError::UnknownItem(item));
        }

        let next = match state.phases.remove(&item) {
            None => ItemPhase::Pending {
                quantity,
                timer: Some(self.spawn_flush_timer(&mut state, item, delay)),
            },
            Some(ItemPhase::Pending { timer, .. }) => {
                if let Some(timer) = timer {
                    timer.cancel();
                }

                ItemPhase::Pending {
                    quantity,
                    timer: Some(self.spawn_flush_timer(&mut state, item, delay)),
                }
            }
            Some(ItemPhase::InFlight { sent }) => ItemPhase::PendingWhileInFlight {
                sent,
                quantity,
                timer: Some(self.spawn_flush_timer(&mut state, item, delay)),
            },
            Some(ItemPhase::PendingWhileInFlight { sent, timer, .. }) => {
                if let Some(timer) = timer {
                    timer.cancel();
                }

                ItemPhase::PendingWhileInFlight {
                    sent,
                    quantity,
                    timer: Some(self.spawn_flush_timer(&mut state, item, delay)),
                }
            }
        };

        state.phases.insert(item, next);

        Ok(quantity)
    }

    /// Send the pending edit of `item` now, skipping the rest of its quiet period.
    pub async fn flush(&self, item: CartItemUuid) {
        self.run_flush(item, None).await;
    }

    async fn run_flush(&self, item: CartItemUuid, claim: Option<u64>) {
        let (quantity, generation) = {
            let mut state = self.state();

            if let Some(timer) = claim
                && !state.claim_item_timer(item, timer)
            {
                return;
            }

            match state.phases.remove(&item) {
                None => return,
                Some(ItemPhase::Pending { quantity, timer }) => {
                    if let Some(timer) = timer {
                        timer.cancel();
                    }

                    state
                        .phases
                        .insert(item, ItemPhase::InFlight { sent: quantity });

                    (quantity, state.generation)
                }
                Some(ItemPhase::PendingWhileInFlight {
                    sent,
                    quantity,
                    timer,
                }) => {
                    if let Some(timer) = timer {
                        timer.cancel();
                    }

                    debug!(item_id = %item, "previous update still running, retrying later");

                    let retry = self.inner.settings.busy_retry;
                    let timer = self.spawn_flush_timer(&mut state, item, retry);

                    state.phases.insert(
                        item,
                        ItemPhase::PendingWhileInFlight {
                            sent,
                            quantity,
                            timer: Some(timer),
                        },
                    );

                    return;
                }
                Some(phase @ ItemPhase::InFlight { .. }) => {
                    state.phases.insert(item, phase);

                    return;
                }
            }
        };

        debug!(item_id = %item, %quantity, "sending quantity update");

        let result = self
            .inner
            .api
            .update_item_quantity(item, quantity)
            .await;

        self.finish_flush(item, generation, quantity, result);
    }

    fn finish_flush(
        &self,
        item: CartItemUuid,
        generation: u64,
        sent: Quantity,
        result: Result<Quantity, ClientError>,
    ) {
        let mut state = self.state();

        if state.generation != generation {
            return;
        }

        let phase = state.phases.remove(&item);

        state.settle_buried_update(item);

        match result {
            Ok(confirmed) => {
                state.confirm_quantity(item, confirmed);

                match phase {
                    Some(ItemPhase::PendingWhileInFlight {
                        quantity, timer, ..
                    }) if quantity != sent => {
                        if let Some(timer) = timer {
                            timer.cancel();
                        }

                        let timer = self.spawn_flush_timer(&mut state, item, Duration::ZERO);

                        state.phases.insert(
                            item,
                            ItemPhase::Pending {
                                quantity,
                                timer: Some(timer),
                            },
                        );
                    }
                    Some(phase) => phase.cancel(),
                    None => {}
                }
            }
            Err(error) => {
                warn!(item_id = %item, %error, "quantity update failed, reverting");

                if let Some(phase) = phase {
                    phase.cancel();
                }

                if error == ClientError::NotFound {
                    self.schedule_refresh(&mut state);
                }

                state.last_error = Some(error);
            }
        }
    }

    /// Add `quantity` of `product` to the cart.
    ///
    /// Returns [`AddOutcome::AlreadyInProgress`] without contacting the server while another
    /// add of the same product is running. A successful add schedules a cart refresh.
    ///
    /// # Errors
    ///
    /// Returns the error of the add request.
    pub async fn add_to_cart(
        &self,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<AddOutcome, ClientError> {
        let generation = {
            let mut state = self.state();

            if !state.adding.insert(product) {
                debug!(product_id = %product, "add already running");

                return Ok(AddOutcome::AlreadyInProgress);
            }

            state.generation
        };

        let result = self.inner.api.add_item(product, quantity).await;

        let mut state = self.state();

        if state.generation == generation {
            state.adding.remove(&product);

            match &result {
                Ok(id) => {
                    state.forget_tombstone(*id);
                    self.schedule_refresh(&mut state);
                }
                Err(error) => {
                    warn!(product_id = %product, %error, "failed to add item");

                    state.last_error = Some(error.clone());
                }
            }
        }

        result.map(AddOutcome::Added)
    }

    /// Delete `item`, removing it from the displayed cart straight away.
    ///
    /// Deleting an item that is already being deleted does nothing. An item the server no
    /// longer has counts as deleted. On any other failure the item is put back where it was.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnknownItem`] when the item is not displayed.
    /// - The error of the delete request when it was rolled back.
    pub async fn remove_item(&self, item: CartItemUuid) -> Result<(), ClientError> {
        let generation = {
            let mut state = self.state();

            if state.tombstones.contains_key(&item) {
                return Ok(());
            }

            if !state.bury(item) {
                return Err(ClientError::UnknownItem(item));
            }

            state.generation
        };

        let result = match self.inner.api.remove_item(item).await {
            Err(ClientError::NotFound) => Ok(()),
            result => result,
        };

        let mut state = self.state();

        if state.generation != generation {
            return result;
        }

        match result {
            Ok(()) => {
                state.confirm_tombstone(item);
                self.schedule_refresh(&mut state);

                Ok(())
            }
            Err(error) => {
                warn!(item_id = %item, %error, "failed to delete item, restoring it");

                state.resurrect(item);
                state.last_error = Some(error.clone());

                Err(error)
            }
        }
    }

    /// Delete every item of the loaded cart, optimistically.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NoCart`] when no cart is loaded.
    /// - The error of the clear request when it was rolled back.
    pub async fn clear_cart(&self) -> Result<(), ClientError> {
        let (cart, buried, generation) = {
            let mut state = self.state();

            let cart = state.cart.as_ref().map(|cart| cart.id).ok_or(ClientError::NoCart)?;
            let ids: Vec<CartItemUuid> = state.items.iter().map(|item| item.id).collect();

            for id in &ids {
                state.bury(*id);
            }

            (cart, ids, state.generation)
        };

        let result = match self.inner.api.clear_cart(cart).await {
            Err(ClientError::NotFound) => Ok(()),
            result => result,
        };

        let mut state = self.state();

        if state.generation != generation {
            return result;
        }

        match result {
            Ok(()) => {
                for id in &buried {
                    state.confirm_tombstone(*id);
                }

                self.schedule_refresh(&mut state);

                Ok(())
            }
            Err(error) => {
                warn!(cart_id = %cart, %error, "failed to clear cart, restoring items");

                for id in buried.iter().rev() {
                    state.resurrect(*id);
                }

                state.last_error = Some(error.clone());

                Err(error)
            }
        }
    }

    /// Forget everything, cancelling all timers. Responses to requests issued before the reset
    /// are ignored.
    pub fn reset(&self) {
        let mut state = self.state();
        let generation = state.generation + 1;

        std::mem::take(&mut *state).cancel_timers();

        state.generation = generation;
    }

    fn spawn_flush_timer(&self, state: &mut State, item: CartItemUuid, delay: Duration) -> Timer {
        let id = state.next_timer_id();
        let session = self.clone();

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            session.run_flush(item, Some(id)).await;
        })
        .abort_handle();

        Timer::new(id, handle)
    }

    fn schedule_refresh(&self, state: &mut State) {
        if let Some(timer) = state.refresh_timer.take() {
            timer.cancel();
        }

        let id = state.next_timer_id();
        let delay = self.inner.settings.refresh_debounce;
        let session = self.clone();

        let handle = tokio::spawn(async move {
            sleep(delay).await;

            let claimed = session.state().claim_refresh_timer(id);

            if claimed && let Err(error) = session.refresh().await {
                debug!(%error, "scheduled refresh failed");
            }
        })
        .abort_handle();

        state.refresh_timer = Some(Timer::new(id, handle));
    }
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();

        f.debug_struct("CartSession")
            .field("settings", &self.inner.settings)
            .field("cart", &state.cart.as_ref().map(|cart| cart.id))
            .field("items", &state.items.len())
            .field("pending", &state.phases.len())
            .finish_non_exhaustive()
    }
}
