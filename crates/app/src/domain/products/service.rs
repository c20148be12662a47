//! Products service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::debug;
use trolley::ProductUuid;

use crate::{
    domain::products::{data::ProductSeed, errors::ProductsServiceError},
    store::{DocumentStore, Fields, StoreError, values},
};

#[derive(Clone)]
pub struct StoreProductsService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl StoreProductsService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Create or overwrite a product's price.
    ///
    /// # Errors
    ///
    /// Returns an error when the store rejects the write.
    pub async fn put_price(
        &self,
        product: ProductUuid,
        price: u64,
    ) -> Result<(), ProductsServiceError> {
        let id = product.to_string();
        let mut fields = Fields::new();

        fields.insert("price".to_string(), json!(price));

        match self.store.create(&self.collection, &id, fields.clone()).await {
            Ok(_) => Ok(()),
            Err(StoreError::Conflict) => {
                self.store.update(&self.collection, &id, fields).await?;

                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Load a catalogue.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    pub async fn seed(&self, products: &[ProductSeed]) -> Result<(), ProductsServiceError> {
        for product in products {
            self.put_price(product.id, product.price).await?;
        }

        debug!(count = products.len(), "seeded product catalogue");

        Ok(())
    }
}

impl Debug for StoreProductsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoreProductsService")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductsService for StoreProductsService {
    async fn get_price(&self, product: ProductUuid) -> Result<u64, ProductsServiceError> {
        let document = self
            .store
            .get(&self.collection, &product.to_string())
            .await?;

        document
            .fields
            .get("price")
            .and_then(values::amount)
            .ok_or(ProductsServiceError::InvalidPrice)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Current unit price of a product, in minor units.
    async fn get_price(&self, product: ProductUuid) -> Result<u64, ProductsServiceError>;
}
