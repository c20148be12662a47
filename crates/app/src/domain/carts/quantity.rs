//! Quantity-delta updater.
//!
//! Adds a signed delta to a cart item's quantity with the same optimistic scheme as the
//! totals reconciler: read, compute, re-read immediately before writing, and start over when
//! the item's version token moved.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{debug, error, warn};
use trolley::{CartItem, CartItemUuid, VersionToken};

use crate::{
    clock::Clock,
    domain::carts::{errors::CartsServiceError, repositories::CartItemsRepository},
    retry::RetryPolicy,
    store::{Collections, DocumentStore, StoreError},
};

enum Attempt {
    Committed(CartItem),
    VersionChanged,
}

/// Applies quantity deltas to an item with version-checked writes.
#[derive(Clone)]
pub struct QuantityUpdater {
    items: CartItemsRepository,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl QuantityUpdater {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collections: &Collections,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            items: CartItemsRepository::new(store, collections.cart_items.clone()),
            clock,
            retry,
        }
    }

    /// Add `delta` to the quantity of `item`, saturating within `1..=999`.
    ///
    /// # Errors
    ///
    /// - [`CartsServiceError::NotFound`] when the item does not exist.
    /// - [`CartsServiceError::RetriesExhausted`] when every attempt lost a race.
    /// - [`CartsServiceError::Store`] for any other store failure.
    pub async fn apply_delta(
        &self,
        item: CartItemUuid,
        delta: i64,
    ) -> Result<CartItem, CartsServiceError> {
        self.run(item, delta, None).await
    }

    /// As [`Self::apply_delta`], using an already-read item as the first snapshot.
    pub(crate) async fn apply_delta_from(
        &self,
        snapshot: CartItem,
        delta: i64,
    ) -> Result<CartItem, CartsServiceError> {
        self.run(snapshot.id, delta, Some(snapshot)).await
    }

    #[tracing::instrument(
        name = "carts.apply_delta",
        skip(self, snapshot),
        fields(item_id = %item),
        err
    )]
    async fn run(
        &self,
        item: CartItemUuid,
        delta: i64,
        mut snapshot: Option<CartItem>,
    ) -> Result<CartItem, CartsServiceError> {
        let mut delays = self.retry.backoff();

        for attempt in 0..self.retry.max_attempts {
            match self.attempt(item, delta, snapshot.take()).await {
                Ok(Attempt::Committed(updated)) => {
                    debug!(attempt, quantity = %updated.quantity, "applied quantity delta");

                    return Ok(updated);
                }
                Ok(Attempt::VersionChanged) => {
                    debug!(attempt, "item changed before the write");
                }
                Err(error) if error.is_transient() => {
                    warn!(attempt, %error, "transient store error while applying delta");
                }
                Err(error) => return Err(error.into()),
            }

            if let Some(delay) = delays.next() {
                self.clock.sleep(delay).await;
            }
        }

        error!(
            attempts = self.retry.max_attempts,
            "gave up applying quantity delta"
        );

        Err(CartsServiceError::RetriesExhausted {
            attempts: self.retry.max_attempts,
        })
    }

    async fn attempt(
        &self,
        item: CartItemUuid,
        delta: i64,
        snapshot: Option<CartItem>,
    ) -> Result<Attempt, StoreError> {
        let snapshot = match snapshot {
            Some(snapshot) => snapshot,
            None => self.items.get(item).await?,
        };

        let quantity = snapshot.quantity.saturating_add(delta);
        let current = self.items.get(item).await?;

        if VersionToken::has_changed(&snapshot.updated_at, &current.updated_at) {
            return Ok(Attempt::VersionChanged);
        }

        let updated = self
            .items
            .write_quantity(item, quantity, self.clock.version_token())
            .await?;

        Ok(Attempt::Committed(updated))
    }
}

impl Debug for QuantityUpdater {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("QuantityUpdater")
            .field("items", &self.items)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
