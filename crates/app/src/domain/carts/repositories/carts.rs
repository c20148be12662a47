//! Carts Repository

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use trolley::{Cart, CartStatus, CartUuid, Totals, UserUuid, VersionToken};

use crate::{
    domain::carts::records::{CartRecord, TotalsRecord, from_document, to_fields},
    store::{DocumentStore, Filter, StoreError, list_all},
};

use super::LIST_BATCH_SIZE;

#[derive(Clone)]
pub(crate) struct CartsRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl CartsRepository {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub(crate) async fn get(&self, id: CartUuid) -> Result<Cart, StoreError> {
        let document = self.store.get(&self.collection, &id.to_string()).await?;
        let (id, record): (CartUuid, CartRecord) = from_document(document)?;

        Ok(record.into_cart(id))
    }

    /// Current version token of a cart.
    pub(crate) async fn version(&self, id: CartUuid) -> Result<VersionToken, StoreError> {
        Ok(self.get(id).await?.updated_at)
    }

    pub(crate) async fn list_active_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Cart>, StoreError> {
        self.list(&[
            Filter::equal("userId", user.to_string()),
            Filter::equal("status", CartStatus::Active.as_str()),
        ])
        .await
    }

    /// Every cart the user ever opened, whatever its status.
    pub(crate) async fn list_for_user(&self, user: UserUuid) -> Result<Vec<Cart>, StoreError> {
        self.list(&[Filter::equal("userId", user.to_string())]).await
    }

    async fn list(&self, filters: &[Filter]) -> Result<Vec<Cart>, StoreError> {
        list_all(&*self.store, &self.collection, filters, LIST_BATCH_SIZE)
            .await?
            .into_iter()
            .map(|document| {
                let (id, record): (CartUuid, CartRecord) = from_document(document)?;

                Ok(record.into_cart(id))
            })
            .collect()
    }

    pub(crate) async fn create(&self, cart: &Cart) -> Result<(), StoreError> {
        let fields = to_fields(&CartRecord::from_cart(cart))?;

        self.store
            .create(&self.collection, &cart.id.to_string(), fields)
            .await?;

        Ok(())
    }

    /// Overwrite the aggregate fields together with a fresh version token.
    pub(crate) async fn write_totals(
        &self,
        id: CartUuid,
        totals: Totals,
        version: VersionToken,
    ) -> Result<(), StoreError> {
        let fields = to_fields(&TotalsRecord {
            totals,
            updated_at: version,
        })?;

        self.store
            .update(&self.collection, &id.to_string(), fields)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete(&self, id: CartUuid) -> Result<(), StoreError> {
        self.store.delete(&self.collection, &id.to_string()).await
    }
}

impl Debug for CartsRepository {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartsRepository")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
