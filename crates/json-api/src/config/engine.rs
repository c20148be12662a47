//! Engine Config

use std::time::Duration;

use clap::Args;
use trolley_app::{context::EngineSettings, retry::RetryPolicy, store::Collections};

/// Optimistic retry settings and collection ids.
#[derive(Debug, Args)]
pub struct EngineConfig {
    /// Attempts per totals recomputation or quantity delta before giving up
    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = 3_u32)]
    pub retry_attempts: u32,

    /// Backoff before the second attempt; doubles per attempt
    #[arg(long, env = "RETRY_BASE_DELAY_MS", default_value_t = 50_u64)]
    pub retry_base_delay_ms: u64,

    /// Carts collection id
    #[arg(long, env = "CARTS_COLLECTION_ID", default_value = "carts")]
    pub carts_collection: String,

    /// Cart items collection id
    #[arg(long, env = "CART_ITEMS_COLLECTION_ID", default_value = "cart_items")]
    pub cart_items_collection: String,

    /// Products collection id
    #[arg(long, env = "PRODUCTS_COLLECTION_ID", default_value = "products")]
    pub products_collection: String,
}

impl EngineConfig {
    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            collections: Collections {
                carts: self.carts_collection.clone(),
                cart_items: self.cart_items_collection.clone(),
                products: self.products_collection.clone(),
            },
            retry: RetryPolicy {
                max_attempts: self.retry_attempts.max(1),
                base_delay: Duration::from_millis(self.retry_base_delay_ms),
            },
        }
    }
}
