//! Cart Data

use trolley::{CartUuid, ProductUuid, Quantity};

/// New Cart Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    /// Target cart. `None` selects the caller's active cart, creating it if needed.
    pub cart: Option<CartUuid>,
    pub product: ProductUuid,
    pub quantity: Quantity,
}

/// Result of removing a cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,

    /// The item was already gone; nothing changed.
    AlreadyDeleted,
}
