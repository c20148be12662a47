//! Cart totals reconciler.
//!
//! Recomputes a cart's `totalItems` and `totalPrice` from its item rows. The store has no
//! transactions, so every attempt brackets the item scan between two reads of the cart's
//! version token and only writes when nobody touched the cart in between. A writer that lands
//! after the second read is not detected; the next reconciliation corrects it.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{debug, error, warn};
use trolley::{CartUuid, Totals, VersionToken};

use crate::{
    clock::Clock,
    domain::carts::{
        errors::CartsServiceError,
        repositories::{CartItemsRepository, CartsRepository},
    },
    retry::RetryPolicy,
    store::{Collections, DocumentStore, StoreError},
};

/// Outcome of a single reconciliation attempt.
enum Attempt {
    Committed(Totals),
    VersionChanged,
}

/// Recomputes a cart's stored totals from its items, retrying when the cart moves underneath.
#[derive(Clone)]
pub struct TotalsReconciler {
    carts: CartsRepository,
    items: CartItemsRepository,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl TotalsReconciler {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collections: &Collections,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            carts: CartsRepository::new(store.clone(), collections.carts.clone()),
            items: CartItemsRepository::new(store, collections.cart_items.clone()),
            clock,
            retry,
        }
    }

    /// Recompute and store the totals of `cart`.
    ///
    /// # Errors
    ///
    /// - [`CartsServiceError::NotFound`] when the cart does not exist.
    /// - [`CartsServiceError::RetriesExhausted`] when every attempt saw a concurrent write or a
    ///   transient store failure.
    /// - [`CartsServiceError::Store`] for any other store failure.
    #[tracing::instrument(name = "carts.reconcile", skip(self), fields(cart_id = %cart), err)]
    pub async fn recalculate(&self, cart: CartUuid) -> Result<Totals, CartsServiceError> {
        let mut delays = self.retry.backoff();

        for attempt in 0..self.retry.max_attempts {
            match self.attempt(cart).await {
                Ok(Attempt::Committed(totals)) => {
                    debug!(
                        attempt,
                        total_items = totals.total_items,
                        total_price = totals.total_price,
                        "stored cart totals"
                    );

                    return Ok(totals);
                }
                Ok(Attempt::VersionChanged) => {
                    debug!(attempt, "cart changed while totals were computed");
                }
                Err(error) if error.is_transient() => {
                    warn!(attempt, %error, "transient store error while reconciling totals");
                }
                Err(error) => return Err(error.into()),
            }

            if let Some(delay) = delays.next() {
                self.clock.sleep(delay).await;
            }
        }

        error!(
            attempts = self.retry.max_attempts,
            "gave up reconciling cart totals"
        );

        Err(CartsServiceError::RetriesExhausted {
            attempts: self.retry.max_attempts,
        })
    }

    async fn attempt(&self, cart: CartUuid) -> Result<Attempt, StoreError> {
        let before = self.carts.version(cart).await?;
        let items = self.items.list_for_cart(cart).await?;
        let totals = Totals::from_items(&items);
        let after = self.carts.version(cart).await?;

        if VersionToken::has_changed(&before, &after) {
            return Ok(Attempt::VersionChanged);
        }

        self.carts
            .write_totals(cart, totals, self.clock.version_token())
            .await?;

        Ok(Attempt::Committed(totals))
    }
}

impl Debug for TotalsReconciler {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TotalsReconciler")
            .field("carts", &self.carts)
            .field("items", &self.items)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
