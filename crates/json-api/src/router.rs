//! App Router

use salvo::Router;

use crate::{auth, carts};

pub fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("carts")
                .get(carts::get::handler)
                .push(Router::with_path("{cart}/items").delete(carts::clear::handler)),
        )
        .push(
            Router::with_path("cart_items")
                .post(carts::items::create::handler)
                .push(
                    Router::with_path("{item}")
                        .put(carts::items::update::handler)
                        .delete(carts::items::delete::handler),
                ),
        )
}
