//! Test support for session tests.

use std::{
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use jiff::Timestamp;
use trolley::{
    Cart, CartItem, CartItemUuid, CartStatus, CartUuid, CartView, ProductUuid, Quantity,
    QuantityError, Totals, UserUuid, VersionToken,
};

use crate::{api::CartApi, errors::ClientError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn item_for(cart: CartUuid, product: ProductUuid, quantity: Quantity, price: u64) -> CartItem {
    CartItem {
        id: CartItemUuid::for_product(cart, product),
        cart_id: cart,
        product_id: product,
        quantity,
        fixed_price: price,
        added_at: Timestamp::UNIX_EPOCH,
        updated_at: VersionToken::new("1"),
    }
}

/// An active cart holding one item per `(quantity, unit price)` line.
pub(crate) fn make_view(lines: &[(i64, u64)]) -> Result<CartView, QuantityError> {
    let cart = CartUuid::new();

    let items = lines
        .iter()
        .map(|&(quantity, price)| {
            Ok(item_for(cart, ProductUuid::new(), Quantity::new(quantity)?, price))
        })
        .collect::<Result<Vec<_>, QuantityError>>()?;

    let totals = Totals::from_items(&items);

    Ok(CartView {
        cart: Cart {
            id: cart,
            user_id: UserUuid::new(),
            status: CartStatus::Active,
            total_items: totals.total_items,
            total_price: totals.total_price,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: VersionToken::new("1"),
        },
        items,
    })
}

/// In-process cart API with switchable latency, failures and lagging deletes.
#[derive(Debug, Default)]
pub(crate) struct FakeCartApi {
    view: Mutex<Option<CartView>>,
    /// Items deleted on the server but still returned by reads.
    lagged: Mutex<Vec<CartItemUuid>>,
    update_delay: Mutex<Duration>,
    add_delay: Mutex<Duration>,
    updates: Mutex<Vec<(CartItemUuid, Quantity)>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub fail_updates: AtomicBool,
    /// Fail item deletes and cart clears.
    pub fail_removes: AtomicBool,
    pub lagging_deletes: AtomicBool,
    pub fetches: AtomicUsize,
    pub adds: AtomicUsize,
    pub removes: AtomicUsize,
    pub clears: AtomicUsize,
}

impl FakeCartApi {
    pub(crate) fn new(view: CartView) -> Self {
        Self {
            view: Mutex::new(Some(view)),
            ..Self::default()
        }
    }

    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn set_update_delay(&self, delay: Duration) {
        *lock(&self.update_delay) = delay;
    }

    pub(crate) fn set_add_delay(&self, delay: Duration) {
        *lock(&self.add_delay) = delay;
    }

    /// Every update request received, in arrival order.
    pub(crate) fn updates(&self) -> Vec<(CartItemUuid, Quantity)> {
        lock(&self.updates).clone()
    }

    /// Make lagging deletes visible to reads.
    pub(crate) fn settle_deletes(&self) {
        let lagged = std::mem::take(&mut *lock(&self.lagged));

        if let Some(view) = lock(&self.view).as_mut() {
            view.items.retain(|item| !lagged.contains(&item.id));
        }
    }
}

#[async_trait]
impl CartApi for FakeCartApi {
    async fn fetch_cart(&self) -> Result<Option<CartView>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        Ok(lock(&self.view).clone())
    }

    async fn add_item(
        &self,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<CartItemUuid, ClientError> {
        self.adds.fetch_add(1, Ordering::SeqCst);

        let delay = *lock(&self.add_delay);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut view = lock(&self.view);
        let view = view.as_mut().ok_or(ClientError::NotFound)?;

        if let Some(item) = view.items.iter_mut().find(|item| item.product_id == product) {
            item.quantity = item.quantity.saturating_add(i64::from(quantity.get()));

            return Ok(item.id);
        }

        let item = item_for(view.cart.id, product, quantity, 1_00);
        let id = item.id;

        view.items.push(item);

        Ok(id)
    }

    async fn update_item_quantity(
        &self,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<Quantity, ClientError> {
        lock(&self.updates).push((item, quantity));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *lock(&self.update_delay);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable("update failed".to_string()));
        }

        let mut view = lock(&self.view);

        let stored = view
            .as_mut()
            .and_then(|view| view.items.iter_mut().find(|line| line.id == item))
            .ok_or(ClientError::NotFound)?;

        stored.quantity = quantity;

        Ok(quantity)
    }

    async fn remove_item(&self, item: CartItemUuid) -> Result<(), ClientError> {
        self.removes.fetch_add(1, Ordering::SeqCst);

        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable("delete failed".to_string()));
        }

        let mut view = lock(&self.view);
        let view = view.as_mut().ok_or(ClientError::NotFound)?;

        if !view.items.iter().any(|line| line.id == item) {
            return Err(ClientError::NotFound);
        }

        if self.lagging_deletes.load(Ordering::SeqCst) {
            lock(&self.lagged).push(item);
        } else {
            view.items.retain(|line| line.id != item);
        }

        Ok(())
    }

    async fn clear_cart(&self, cart: CartUuid) -> Result<(), ClientError> {
        self.clears.fetch_add(1, Ordering::SeqCst);

        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable("clear failed".to_string()));
        }

        let mut view = lock(&self.view);

        match view.as_mut() {
            Some(view) if view.cart.id == cart => {
                view.items.clear();

                Ok(())
            }
            _ => Err(ClientError::NotFound),
        }
    }
}
