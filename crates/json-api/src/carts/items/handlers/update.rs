//! Update Cart Item Quantity Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley::Quantity;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Update Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New absolute quantity, between 1 and 999
    pub quantity: i64,
}

/// Quantity Updated Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemUpdatedResponse {
    /// Cart item id
    pub id: Uuid,

    /// Quantity now stored
    pub quantity: u16,
}

/// Update Cart Item Handler
#[endpoint(
    tags("cart_items"),
    summary = "Set Cart Item Quantity",
    security(("user_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Item belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::CONFLICT, description = "Cart is no longer active"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Cart busy, retry"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemUpdatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let item = item.into_inner();

    let quantity = Quantity::new(json.into_inner().quantity)
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let stored = state
        .carts
        .update_item_quantity(user, item.into(), quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartItemUpdatedResponse {
        id: item,
        quantity: stored.get(),
    }))
}
