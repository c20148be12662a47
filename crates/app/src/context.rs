//! App Context

use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    domain::{
        carts::{CartsService, StoreCartsService},
        products::StoreProductsService,
    },
    retry::RetryPolicy,
    store::{Collections, DocumentStore},
};

/// Tunables of the server-side engine.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub collections: Collections,
    pub retry: RetryPolicy,
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub products: Arc<StoreProductsService>,
}

impl AppContext {
    /// Build application context over a document store, using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, settings: &EngineSettings) -> Self {
        Self::with_clock(store, settings, Arc::new(SystemClock::new()))
    }

    #[must_use]
    pub fn with_clock(
        store: Arc<dyn DocumentStore>,
        settings: &EngineSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let products = Arc::new(StoreProductsService::new(
            store.clone(),
            settings.collections.products.clone(),
        ));

        let carts = StoreCartsService::new(
            store,
            &settings.collections,
            products.clone(),
            clock,
            settings.retry,
        );

        Self {
            carts: Arc::new(carts),
            products,
        }
    }
}
