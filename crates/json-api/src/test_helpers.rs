//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use trolley::{
    Cart, CartItem, CartItemUuid, CartStatus, CartUuid, CartView, ProductUuid, Quantity,
    QuantityError, Totals, UserUuid, VersionToken,
};
use trolley_app::domain::carts::MockCartsService;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user(TEST_USER);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(Arc::new(State::new(Arc::new(carts)))))
            .hoop(inject_user)
            .push(route),
    )
}

/// An active cart owned by `user` with two items.
pub(crate) fn make_view(user: UserUuid) -> Result<CartView, QuantityError> {
    let cart = CartUuid::new();

    let items = [(2, 3_50), (1, 12_00)]
        .into_iter()
        .map(|(quantity, price)| {
            let product = ProductUuid::new();

            Ok(CartItem {
                id: CartItemUuid::for_product(cart, product),
                cart_id: cart,
                product_id: product,
                quantity: Quantity::new(quantity)?,
                fixed_price: price,
                added_at: Timestamp::UNIX_EPOCH,
                updated_at: VersionToken::new("1"),
            })
        })
        .collect::<Result<Vec<_>, QuantityError>>()?;

    let totals = Totals::from_items(&items);

    Ok(CartView {
        cart: Cart {
            id: cart,
            user_id: user,
            status: CartStatus::Active,
            total_items: totals.total_items,
            total_price: totals.total_price,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: VersionToken::new("1"),
        },
        items,
    })
}
