//! Cart Items Repository

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use trolley::{CartItem, CartItemUuid, CartUuid, Quantity, VersionToken};

use crate::{
    domain::carts::records::{CartItemRecord, QuantityRecord, from_document, to_fields},
    store::{Document, DocumentStore, Filter, StoreError, list_all},
};

use super::LIST_BATCH_SIZE;

#[derive(Clone)]
pub(crate) struct CartItemsRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl CartItemsRepository {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub(crate) async fn get(&self, id: CartItemUuid) -> Result<CartItem, StoreError> {
        let document = self.store.get(&self.collection, &id.to_string()).await?;

        into_item(document)
    }

    /// Every item of a cart, read in batches.
    pub(crate) async fn list_for_cart(&self, cart: CartUuid) -> Result<Vec<CartItem>, StoreError> {
        let filters = [Filter::equal("cartId", cart.to_string())];

        list_all(&*self.store, &self.collection, &filters, LIST_BATCH_SIZE)
            .await?
            .into_iter()
            .map(into_item)
            .collect()
    }

    /// Insert a new item. Fails with [`StoreError::Conflict`] if the id is taken.
    pub(crate) async fn create(&self, item: &CartItem) -> Result<(), StoreError> {
        let fields = to_fields(&CartItemRecord::from_item(item))?;

        self.store
            .create(&self.collection, &item.id.to_string(), fields)
            .await?;

        Ok(())
    }

    pub(crate) async fn write_quantity(
        &self,
        id: CartItemUuid,
        quantity: Quantity,
        version: VersionToken,
    ) -> Result<CartItem, StoreError> {
        let fields = to_fields(&QuantityRecord {
            quantity,
            updated_at: version,
        })?;

        let document = self
            .store
            .update(&self.collection, &id.to_string(), fields)
            .await?;

        into_item(document)
    }

    pub(crate) async fn delete(&self, id: CartItemUuid) -> Result<(), StoreError> {
        self.store.delete(&self.collection, &id.to_string()).await
    }
}

fn into_item(document: Document) -> Result<CartItem, StoreError> {
    let (id, record): (CartItemUuid, CartItemRecord) = from_document(document)?;

    Ok(record.into_item(id))
}

impl Debug for CartItemsRepository {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartItemsRepository")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
