//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley::{Quantity, QuantityError};
use trolley_app::domain::carts::NewCartItem;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

fn default_quantity() -> i64 {
    1
}

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCartItemRequest {
    /// Product to add
    pub product_id: Uuid,

    /// Quantity to add, between 1 and 999
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Target cart; defaults to the caller's active cart, created on demand
    #[serde(default)]
    pub cart_id: Option<Uuid>,
}

impl TryFrom<CreateCartItemRequest> for NewCartItem {
    type Error = QuantityError;

    fn try_from(request: CreateCartItemRequest) -> Result<Self, Self::Error> {
        Ok(NewCartItem {
            cart: request.cart_id.map(Into::into),
            product: request.product_id.into(),
            quantity: Quantity::new(request.quantity)?,
        })
    }
}

/// Cart Item Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemCreatedResponse {
    /// Id of the created or merged cart item
    pub id: Uuid,
}

/// Create Cart Item Handler
///
/// Adding a product that is already in the cart adds to its quantity.
#[endpoint(
    tags("cart_items"),
    summary = "Add Item to Cart",
    security(("user_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item created or merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Cart belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
        (status_code = StatusCode::CONFLICT, description = "Cart is no longer active"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Cart busy, retry"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart_items.create",
    skip(json, depot, res),
    fields(
        user_id = tracing::field::Empty,
        product_id = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_id", tracing::field::display(user));
    span.record("product_id", tracing::field::display(request.product_id));
    span.record("quantity", request.quantity);

    let item = NewCartItem::try_from(request)
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let id = state
        .carts
        .add_item(user, item)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/cart_items/{id}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(item_id = %id, "added cart item");

    Ok(Json(CartItemCreatedResponse { id: id.into_uuid() }))
}
