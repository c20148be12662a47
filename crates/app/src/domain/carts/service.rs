//! Carts service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};
use trolley::{
    Cart, CartItem, CartItemUuid, CartStatus, CartUuid, CartView, Quantity, Totals, UserUuid,
    VersionToken,
};

use crate::{
    clock::Clock,
    domain::{
        carts::{
            data::{NewCartItem, RemoveOutcome},
            errors::CartsServiceError,
            quantity::QuantityUpdater,
            reconciler::TotalsReconciler,
            repositories::{CartItemsRepository, CartsRepository},
        },
        products::ProductsService,
    },
    retry::RetryPolicy,
    store::{Collections, DocumentStore, StoreError},
};

#[derive(Clone)]
pub struct StoreCartsService {
    carts: CartsRepository,
    items: CartItemsRepository,
    products: Arc<dyn ProductsService>,
    reconciler: TotalsReconciler,
    updater: QuantityUpdater,
    clock: Arc<dyn Clock>,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collections: &Collections,
        products: Arc<dyn ProductsService>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            carts: CartsRepository::new(store.clone(), collections.carts.clone()),
            items: CartItemsRepository::new(store.clone(), collections.cart_items.clone()),
            products,
            reconciler: TotalsReconciler::new(
                store.clone(),
                collections,
                clock.clone(),
                retry,
            ),
            updater: QuantityUpdater::new(store, collections, clock.clone(), retry),
            clock,
        }
    }

    /// Load a cart the caller may modify.
    async fn writable_cart(
        &self,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<Cart, CartsServiceError> {
        let cart = self.carts.get(cart).await?;

        if !cart.is_owned_by(user) {
            return Err(CartsServiceError::Forbidden);
        }

        if !cart.is_active() {
            return Err(CartsServiceError::Inactive(cart.status));
        }

        Ok(cart)
    }

    /// The user's active cart. With several, the oldest wins.
    async fn active_cart(&self, user: UserUuid) -> Result<Option<Cart>, CartsServiceError> {
        let carts = self.carts.list_active_for_user(user).await?;

        Ok(oldest(carts.into_iter()))
    }

    /// The user's active cart, opening one under a deterministic id when there is none.
    ///
    /// Racing first adds read the same cart history, derive the same id and so meet on one
    /// document: the insert that loses with a conflict adopts the stored cart.
    async fn find_or_create_active_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let carts = self.carts.list_for_user(user).await?;
        let opened = u64::try_from(carts.len()).unwrap_or(u64::MAX);

        if let Some(cart) = oldest(carts.into_iter().filter(Cart::is_active)) {
            return Ok(cart);
        }

        for sequence in opened..opened.saturating_add(u64::from(CART_SEQUENCE_ATTEMPTS)) {
            let now = self.clock.now();

            let created = Cart {
                id: CartUuid::active_for(user, sequence),
                user_id: user,
                status: CartStatus::Active,
                total_items: 0,
                total_price: 0,
                created_at: now,
                updated_at: VersionToken::from_timestamp(now),
            };

            match self.carts.create(&created).await {
                Ok(()) => return Ok(created),
                Err(StoreError::Conflict) => {}
                Err(error) => return Err(error.into()),
            }

            match self.carts.get(created.id).await {
                Ok(cart) if cart.is_owned_by(user) && cart.is_active() => {
                    debug!(cart_id = %cart.id, "cart opened concurrently, adopting it");

                    return Ok(cart);
                }
                Ok(_) | Err(StoreError::NotFound) => {
                    debug!(cart_id = %created.id, sequence, "cart id taken, trying the next");
                }
                Err(error) => return Err(error.into()),
            }
        }

        warn!(user_id = %user, "no free cart id");

        Err(CartsServiceError::RetriesExhausted {
            attempts: CART_SEQUENCE_ATTEMPTS,
        })
    }
}

/// Ids tried past the user's cart count before giving up.
const CART_SEQUENCE_ATTEMPTS: u32 = 8;

fn oldest(carts: impl Iterator<Item = Cart>) -> Option<Cart> {
    carts.min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
}

impl Debug for StoreCartsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoreCartsService")
            .field("carts", &self.carts)
            .field("items", &self.items)
            .field("reconciler", &self.reconciler)
            .field("updater", &self.updater)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(name = "carts.add_item", skip(self), fields(user_id = %user), err)]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItemUuid, CartsServiceError> {
        let price = self.products.get_price(item.product).await?;

        let cart = match item.cart {
            Some(cart) => self.writable_cart(user, cart).await?,
            None => self.find_or_create_active_cart(user).await?,
        };

        let id = CartItemUuid::for_product(cart.id, item.product);
        let delta = i64::from(item.quantity.get());

        match self.items.get(id).await {
            Ok(existing) => {
                self.updater.apply_delta_from(existing, delta).await?;
            }
            Err(StoreError::NotFound) => {
                let now = self.clock.now();

                let line = CartItem {
                    id,
                    cart_id: cart.id,
                    product_id: item.product,
                    quantity: item.quantity,
                    fixed_price: price,
                    added_at: now,
                    updated_at: VersionToken::from_timestamp(now),
                };

                match self.items.create(&line).await {
                    Ok(()) => {}
                    Err(StoreError::Conflict) => {
                        debug!(item_id = %id, "item created concurrently, merging quantity");

                        self.updater.apply_delta(id, delta).await?;
                    }
                    Err(error) => return Err(error.into()),
                }
            }
            Err(error) => return Err(error.into()),
        }

        self.reconciler.recalculate(cart.id).await?;

        Ok(id)
    }

    #[tracing::instrument(
        name = "carts.update_item_quantity",
        skip(self),
        fields(user_id = %user, item_id = %item),
        err
    )]
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<Quantity, CartsServiceError> {
        let line = self.items.get(item).await?;
        let cart = self.writable_cart(user, line.cart_id).await?;

        let updated = self
            .items
            .write_quantity(item, quantity, self.clock.version_token())
            .await?;

        self.reconciler.recalculate(cart.id).await?;

        Ok(updated.quantity)
    }

    #[tracing::instrument(
        name = "carts.remove_item",
        skip(self),
        fields(user_id = %user, item_id = %item),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<RemoveOutcome, CartsServiceError> {
        let line = match self.items.get(item).await {
            Ok(line) => line,
            Err(StoreError::NotFound) => return Ok(RemoveOutcome::AlreadyDeleted),
            Err(error) => return Err(error.into()),
        };

        let cart = match self.writable_cart(user, line.cart_id).await {
            Ok(cart) => cart,
            Err(CartsServiceError::NotFound) => return Ok(RemoveOutcome::AlreadyDeleted),
            Err(error) => return Err(error),
        };

        match self.items.delete(item).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                debug!("item deleted concurrently");

                return Ok(RemoveOutcome::AlreadyDeleted);
            }
            Err(error) => return Err(error.into()),
        }

        self.reconciler.recalculate(cart.id).await?;

        Ok(RemoveOutcome::Removed)
    }

    #[tracing::instrument(
        name = "carts.clear_cart",
        skip(self),
        fields(user_id = %user, cart_id = %cart),
        err
    )]
    async fn clear_cart(&self, user: UserUuid, cart: CartUuid) -> Result<(), CartsServiceError> {
        let cart = self.writable_cart(user, cart).await?;

        for line in self.items.list_for_cart(cart.id).await? {
            match self.items.delete(line.id).await {
                Ok(()) | Err(StoreError::NotFound) => {}
                Err(error) => return Err(error.into()),
            }
        }

        self.reconciler.recalculate(cart.id).await?;

        Ok(())
    }

    async fn get_cart_view(&self, user: UserUuid) -> Result<Option<CartView>, CartsServiceError> {
        let Some(cart) = self.active_cart(user).await? else {
            return Ok(None);
        };

        let items = self.items.list_for_cart(cart.id).await?;

        Ok(Some(CartView { cart, items }))
    }

    async fn recalculate_totals(&self, cart: CartUuid) -> Result<Totals, CartsServiceError> {
        self.reconciler.recalculate(cart).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a product to a cart, merging into an existing line for the same product.
    ///
    /// Returns the id of the affected line.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItemUuid, CartsServiceError>;

    /// Set an item's quantity, returning the stored quantity.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<Quantity, CartsServiceError>;

    /// Delete an item. Deleting an item that no longer exists succeeds.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<RemoveOutcome, CartsServiceError>;

    /// Delete every item of a cart.
    async fn clear_cart(&self, user: UserUuid, cart: CartUuid) -> Result<(), CartsServiceError>;

    /// The user's active cart with its items, if there is one.
    async fn get_cart_view(&self, user: UserUuid) -> Result<Option<CartView>, CartsServiceError>;

    /// Recompute a cart's stored totals from its items.
    async fn recalculate_totals(&self, cart: CartUuid) -> Result<Totals, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{
        domain::products::MockProductsService,
        test::{InterferingStore, TestContext, YieldingStore},
    };

    use super::*;

    fn new_item(
        product: trolley::ProductUuid,
        quantity: i64,
    ) -> Result<NewCartItem, CartsServiceError> {
        Ok(NewCartItem {
            cart: None,
            product,
            quantity: Quantity::new(quantity)?,
        })
    }

    #[tokio::test]
    async fn first_add_creates_cart_and_line() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(12_50).await?;

        let id = ctx.carts.add_item(ctx.user, new_item(product, 2)?).await?;

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;
        let line = view.item(id).ok_or("line missing")?;

        assert_eq!(line.quantity, Quantity::new(2)?);
        assert_eq!(line.fixed_price, 12_50);
        assert_eq!(
            view.cart.totals(),
            Totals {
                total_items: 2,
                total_price: 25_00,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn repeated_add_merges_into_one_line() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(5_00).await?;

        let first = ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;
        let second = ctx.carts.add_item(ctx.user, new_item(product, 3)?).await?;

        assert_eq!(first, second);

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(view.items.len(), 1);
        assert_eq!(
            view.cart.totals(),
            Totals {
                total_items: 4,
                total_price: 20_00,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn merged_line_keeps_its_original_price() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(5_00).await?;

        ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;
        ctx.products.put_price(product, 9_00).await?;
        ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(view.cart.total_price, 10_00);

        Ok(())
    }

    #[tokio::test]
    async fn merged_quantity_saturates() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1).await?;

        ctx.carts.add_item(ctx.user, new_item(product, 900)?).await?;
        let id = ctx.carts.add_item(ctx.user, new_item(product, 900)?).await?;

        assert_eq!(ctx.stored_item(id).await?.quantity, Quantity::MAX);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_of_same_product_sum_up() -> TestResult {
        let ctx = TestContext::with_store(YieldingStore::new);
        let product = ctx.create_product(10_00).await?;
        let cart = ctx.create_cart(ctx.user).await?;
        let carts = Arc::new(ctx.carts.clone());
        let mut tasks = JoinSet::new();

        for quantity in [2, 3] {
            let carts = carts.clone();
            let user = ctx.user;
            let item = NewCartItem {
                cart: Some(cart),
                product,
                quantity: Quantity::new(quantity)?,
            };

            tasks.spawn(async move { carts.add_item(user, item).await });
        }

        while let Some(result) = tasks.join_next().await {
            result??;
        }

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(view.items.len(), 1);
        assert_eq!(
            view.items.first().map(|line| line.quantity),
            Some(Quantity::new(5)?)
        );
        assert_eq!(
            view.cart.totals(),
            Totals {
                total_items: 5,
                total_price: 50_00,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_first_adds_share_one_cart() -> TestResult {
        let ctx = TestContext::with_store(YieldingStore::new);
        let mut products = Vec::new();

        for price in [1_00, 2_00, 3_00, 4_00] {
            products.push(ctx.create_product(price).await?);
        }

        let carts = Arc::new(ctx.carts.clone());
        let mut tasks = JoinSet::new();

        for product in products {
            let carts = carts.clone();
            let user = ctx.user;
            let item = new_item(product, 1)?;

            tasks.spawn(async move { carts.add_item(user, item).await });
        }

        while let Some(result) = tasks.join_next().await {
            result??;
        }

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(ctx.active_carts(ctx.user).await?, 1);
        assert_eq!(view.items.len(), 4);
        assert_eq!(view.cart.total_price, 10_00);

        Ok(())
    }

    #[tokio::test]
    async fn cart_opened_by_a_racing_request_is_adopted() -> TestResult {
        let ctx =
            TestContext::with_store(|inner| InterferingStore::racing_cart_creates(inner, 1));
        let product = ctx.create_product(2_00).await?;

        let id = ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;
        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(ctx.active_carts(ctx.user).await?, 1);
        assert_eq!(view.cart.id, CartUuid::active_for(ctx.user, 0));
        assert!(view.item(id).is_some());
        assert_eq!(view.cart.total_price, 2_00);

        Ok(())
    }

    #[tokio::test]
    async fn closed_carts_get_a_fresh_successor() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1_00).await?;

        ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let first = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        ctx.set_status(first.cart.id, CartStatus::Ordered).await?;
        ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let second = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(first.cart.id, CartUuid::active_for(ctx.user, 0));
        assert_eq!(second.cart.id, CartUuid::active_for(ctx.user, 1));
        assert_eq!(ctx.active_carts(ctx.user).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn taken_cart_ids_are_skipped() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1_00).await?;
        let taken = ctx
            .create_cart_with_id(CartUuid::active_for(ctx.user, 1), ctx.user)
            .await?;

        ctx.set_status(taken, CartStatus::Canceled).await?;
        ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(view.cart.id, CartUuid::active_for(ctx.user, 2));
        assert_eq!(ctx.stored_cart(taken).await?.status, CartStatus::Canceled);

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_unknown_product() -> TestResult {
        let ctx = TestContext::new();

        let result = ctx
            .carts
            .add_item(ctx.user, new_item(trolley::ProductUuid::new(), 1)?)
            .await;

        assert!(matches!(result, Err(CartsServiceError::ProductNotFound)));
        assert_eq!(ctx.active_carts(ctx.user).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn add_to_foreign_cart_is_forbidden() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1_00).await?;
        let cart = ctx.create_cart(UserUuid::new()).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                NewCartItem {
                    cart: Some(cart),
                    product,
                    quantity: Quantity::MIN,
                },
            )
            .await;

        assert!(matches!(result, Err(CartsServiceError::Forbidden)));

        Ok(())
    }

    #[tokio::test]
    async fn add_to_ordered_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1_00).await?;
        let cart = ctx.create_cart(ctx.user).await?;

        ctx.set_status(cart, CartStatus::Ordered).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                NewCartItem {
                    cart: Some(cart),
                    product,
                    quantity: Quantity::MIN,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(CartsServiceError::Inactive(CartStatus::Ordered))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn add_does_not_touch_cart_when_price_lookup_fails() -> TestResult {
        let ctx = TestContext::new();
        let mut products = MockProductsService::new();

        products
            .expect_get_price()
            .times(1)
            .returning(|_| Err(crate::domain::products::ProductsServiceError::InvalidPrice));

        let carts = StoreCartsService::new(
            ctx.store.clone(),
            &Collections::default(),
            Arc::new(products),
            ctx.clock.clone(),
            RetryPolicy::default(),
        );

        let result = carts
            .add_item(ctx.user, new_item(trolley::ProductUuid::new(), 1)?)
            .await;

        assert!(matches!(result, Err(CartsServiceError::Products(_))));
        assert_eq!(ctx.active_carts(ctx.user).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn update_sets_absolute_quantity() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(3_00).await?;
        let id = ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let confirmed = ctx
            .carts
            .update_item_quantity(ctx.user, id, Quantity::new(4)?)
            .await?;

        assert_eq!(confirmed, Quantity::new(4)?);

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert_eq!(
            view.cart.totals(),
            Totals {
                total_items: 4,
                total_price: 12_00,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_of_foreign_item_is_forbidden() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(3_00).await?;
        let id = ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let result = ctx
            .carts
            .update_item_quantity(UserUuid::new(), id, Quantity::new(2)?)
            .await;

        assert!(matches!(result, Err(CartsServiceError::Forbidden)));
        assert_eq!(ctx.stored_item(id).await?.quantity, Quantity::MIN);

        Ok(())
    }

    #[tokio::test]
    async fn update_of_missing_item_is_not_found() -> TestResult {
        let ctx = TestContext::new();

        let result = ctx
            .carts
            .update_item_quantity(ctx.user, CartItemUuid::new(), Quantity::MIN)
            .await;

        assert!(matches!(result, Err(CartsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn remove_deletes_line_and_reconciles() -> TestResult {
        let ctx = TestContext::new();
        let kept = ctx.create_product(1_00).await?;
        let removed = ctx.create_product(2_00).await?;

        ctx.carts.add_item(ctx.user, new_item(kept, 1)?).await?;
        let id = ctx.carts.add_item(ctx.user, new_item(removed, 2)?).await?;

        let outcome = ctx.carts.remove_item(ctx.user, id).await?;

        assert_eq!(outcome, RemoveOutcome::Removed);

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert!(view.item(id).is_none());
        assert_eq!(
            view.cart.totals(),
            Totals {
                total_items: 1,
                total_price: 1_00,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_twice_is_idempotent() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1_00).await?;
        let id = ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        ctx.carts.remove_item(ctx.user, id).await?;

        let outcome = ctx.carts.remove_item(ctx.user, id).await?;

        assert_eq!(outcome, RemoveOutcome::AlreadyDeleted);

        Ok(())
    }

    #[tokio::test]
    async fn remove_of_foreign_item_is_forbidden() -> TestResult {
        let ctx = TestContext::new();
        let product = ctx.create_product(1_00).await?;
        let id = ctx.carts.add_item(ctx.user, new_item(product, 1)?).await?;

        let result = ctx.carts.remove_item(UserUuid::new(), id).await;

        assert!(matches!(result, Err(CartsServiceError::Forbidden)));
        assert!(ctx.stored_item(id).await.is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_cart_and_zeroes_totals() -> TestResult {
        let ctx = TestContext::new();

        for price in [1_00, 2_00, 3_00] {
            let product = ctx.create_product(price).await?;

            ctx.carts.add_item(ctx.user, new_item(product, 2)?).await?;
        }

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        ctx.carts.clear_cart(ctx.user, view.cart.id).await?;

        let view = ctx.carts.get_cart_view(ctx.user).await?.ok_or("cart missing")?;

        assert!(view.items.is_empty());
        assert_eq!(view.cart.totals(), Totals::default());

        Ok(())
    }

    #[tokio::test]
    async fn clear_of_foreign_cart_is_forbidden() -> TestResult {
        let ctx = TestContext::new();
        let cart = ctx.create_cart(UserUuid::new()).await?;

        let result = ctx.carts.clear_cart(ctx.user, cart).await;

        assert!(matches!(result, Err(CartsServiceError::Forbidden)));

        Ok(())
    }

    #[tokio::test]
    async fn view_is_none_without_active_cart() -> TestResult {
        let ctx = TestContext::new();
        let cart = ctx.create_cart(ctx.user).await?;

        ctx.set_status(cart, CartStatus::Canceled).await?;

        assert!(ctx.carts.get_cart_view(ctx.user).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn recalculate_repairs_drifted_totals() -> TestResult {
        let ctx = TestContext::new();
        let cart = ctx.create_cart(ctx.user).await?;

        ctx.insert_item(cart, 3, 2_00).await?;

        let totals = ctx.carts.recalculate_totals(cart).await?;

        assert_eq!(
            totals,
            Totals {
                total_items: 3,
                total_price: 6_00,
            }
        );

        Ok(())
    }
}
