//! Cart Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    products::ProductUuid, quantity::Quantity, totals::Totals, users::UserUuid,
    uuids::TypedUuid, version::VersionToken,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

impl CartUuid {
    /// Deterministic id of the `sequence`-th cart opened for `user`.
    ///
    /// Requests that find no active cart derive the same id from the same listing, so only
    /// one of their inserts succeeds and the others adopt the stored cart.
    #[must_use]
    pub fn active_for(user: UserUuid, sequence: u64) -> Self {
        Self::from_uuid(Uuid::new_v5(&user.into_uuid(), &sequence.to_be_bytes()))
    }
}

impl CartItemUuid {
    /// Deterministic line id for `product` inside `cart`.
    ///
    /// Two requests adding the same product to the same cart derive the same id, so the
    /// store's duplicate-id check turns a racing second insert into a conflict instead of a
    /// second row.
    #[must_use]
    pub fn for_product(cart: CartUuid, product: ProductUuid) -> Self {
        Self::from_uuid(Uuid::new_v5(
            &cart.into_uuid(),
            product.into_uuid().as_bytes(),
        ))
    }
}

/// Cart lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    /// Open for modification.
    #[default]
    Active,

    /// Checked out.
    Ordered,

    /// Explicitly abandoned.
    Canceled,
}

impl CartStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ordered => "ordered",
            Self::Canceled => "canceled",
        }
    }
}

impl Display for CartStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartUuid,
    pub user_id: UserUuid,
    pub status: CartStatus,
    pub total_items: u64,
    pub total_price: u64,
    pub created_at: Timestamp,
    pub updated_at: VersionToken,
}

impl Cart {
    /// Stored aggregate fields.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals {
            total_items: self.total_items,
            total_price: self.total_price,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user: UserUuid) -> bool {
        self.user_id == user
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CartStatus::Active
    }
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemUuid,
    pub cart_id: CartUuid,
    pub product_id: ProductUuid,
    pub quantity: Quantity,
    /// Unit price captured when the product was first added, in minor units.
    pub fixed_price: u64,
    pub added_at: Timestamp,
    pub updated_at: VersionToken,
}

/// A cart together with its items, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

impl CartView {
    #[must_use]
    pub fn item(&self, id: CartItemUuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Totals recomputed from the listed items, ignoring the stored aggregate.
    #[must_use]
    pub fn computed_totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }
}
