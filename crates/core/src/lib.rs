//! Trolley
//!
//! Shared cart data model used by both halves of the trolley cart consistency engine: the
//! server-side totals reconciler and the client-side mutation coalescer.

pub mod carts;
pub mod products;
pub mod quantity;
pub mod totals;
pub mod users;
pub mod uuids;
pub mod version;

pub use carts::{Cart, CartItem, CartItemUuid, CartStatus, CartUuid, CartView};
pub use products::ProductUuid;
pub use quantity::{Quantity, QuantityError};
pub use totals::Totals;
pub use users::UserUuid;
pub use uuids::TypedUuid;
pub use version::VersionToken;
