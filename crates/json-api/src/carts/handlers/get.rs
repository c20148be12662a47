//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley::{CartItem, CartView};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Active Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The caller's active cart, or `null` when there is none
    pub cart: Option<CartViewResponse>,
}

/// Cart with its items
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartViewResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// Owner of the cart
    pub user_id: Uuid,

    /// Lifecycle status (active, ordered, canceled)
    pub status: String,

    /// Sum of item quantities
    pub total_items: u64,

    /// Sum of quantity times fixed price, in minor units
    pub total_price: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// Version token of the cart's last write
    pub updated_at: String,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,
}

impl From<CartView> for CartViewResponse {
    fn from(view: CartView) -> Self {
        Self {
            id: view.cart.id.into_uuid(),
            user_id: view.cart.user_id.into_uuid(),
            status: view.cart.status.to_string(),
            total_items: view.cart.total_items,
            total_price: view.cart.total_price,
            created_at: view.cart.created_at.to_string(),
            updated_at: view.cart.updated_at.to_string(),
            items: view.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub id: Uuid,

    /// The cart the item belongs to
    pub cart_id: Uuid,

    /// The product in the cart item
    pub product_id: Uuid,

    /// Quantity, between 1 and 999
    pub quantity: u16,

    /// Unit price captured when the product was first added, in minor units
    pub fixed_price: u64,

    /// The date and time the item was added
    pub added_at: String,

    /// Version token of the item's last write
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id.into_uuid(),
            cart_id: item.cart_id.into_uuid(),
            product_id: item.product_id.into_uuid(),
            quantity: item.quantity.get(),
            fixed_price: item.fixed_price,
            added_at: item.added_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's active cart with its items.
#[endpoint(
    tags("carts"),
    summary = "Get Active Cart",
    security(("user_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Active cart, or null"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing caller"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unavailable"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let cart = state
        .carts
        .get_cart_view(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse {
        cart: cart.map(CartViewResponse::from),
    }))
}
