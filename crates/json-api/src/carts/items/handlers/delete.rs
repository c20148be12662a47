//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::RemoveOutcome;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Item Deleted Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemDeletedResponse {
    /// Cart item id
    pub id: Uuid,

    /// True when the item was already gone
    pub already_deleted: bool,
}

/// Delete Cart Item Handler
///
/// Deleting an item that no longer exists succeeds.
#[endpoint(
    tags("cart_items"),
    summary = "Delete Cart Item",
    security(("user_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart item deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Item belongs to another user"),
        (status_code = StatusCode::CONFLICT, description = "Cart is no longer active"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Cart busy, retry"),
    )
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartItemDeletedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let item = item.into_inner();

    let outcome = state
        .carts
        .remove_item(user, item.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartItemDeletedResponse {
        id: item,
        already_deleted: outcome == RemoveOutcome::AlreadyDeleted,
    }))
}
