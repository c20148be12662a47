//! Product Data

use serde::{Deserialize, Serialize};
use trolley::ProductUuid;

/// Catalogue entry loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub id: ProductUuid,

    /// Unit price in minor units.
    pub price: u64,
}
