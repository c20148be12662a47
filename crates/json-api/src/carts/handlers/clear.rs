//! Clear Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Cleared Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartClearedResponse {
    /// Always true
    pub success: bool,
}

/// Clear Cart Handler
///
/// Deletes every item of the cart and recomputes its totals.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("user_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Cart belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::CONFLICT, description = "Cart is no longer active"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Cart busy, retry"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartClearedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    state
        .carts
        .clear_cart(user, cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartClearedResponse { success: true }))
}
