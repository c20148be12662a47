//! Cart API contract consumed by the session.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use trolley::{CartItemUuid, CartUuid, CartView, ProductUuid, Quantity};

use crate::errors::ClientError;

/// Server operations the session relies on, on behalf of one user.
#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// The user's active cart, if any.
    async fn fetch_cart(&self) -> Result<Option<CartView>, ClientError>;

    /// Add `quantity` of a product to the active cart.
    async fn add_item(
        &self,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<CartItemUuid, ClientError>;

    /// Set an item's quantity. Returns the quantity the server stored.
    async fn update_item_quantity(
        &self,
        item: CartItemUuid,
        quantity: Quantity,
    ) -> Result<Quantity, ClientError>;

    /// Delete an item. Fails with [`ClientError::NotFound`] when it is already gone.
    async fn remove_item(&self, item: CartItemUuid) -> Result<(), ClientError>;

    /// Delete every item of a cart.
    async fn clear_cart(&self, cart: CartUuid) -> Result<(), ClientError>;
}

/// `GET /carts` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartResponse {
    pub cart: Option<CartView>,
}

/// `POST /cart_items` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductUuid,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<CartUuid>,
}

/// `POST /cart_items` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItemResponse {
    pub id: CartItemUuid,
}

/// `PUT /cart_items/{item}` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Quantity,
}

/// `PUT /cart_items/{item}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantityResponse {
    pub id: CartItemUuid,
    pub quantity: Quantity,
}
