//! Cart Records
//!
//! Stored attribute layout of cart and cart item documents.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trolley::{
    Cart, CartItem, CartItemUuid, CartStatus, CartUuid, ProductUuid, Quantity, Totals, TypedUuid,
    UserUuid, VersionToken,
};

use crate::store::{Document, Fields, StoreError, values::deserialize_amount};

/// Cart Record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartRecord {
    pub user_id: UserUuid,
    pub status: CartStatus,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_items: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_price: u64,
    #[serde(default = "epoch")]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: VersionToken,
}

impl CartRecord {
    pub(crate) fn from_cart(cart: &Cart) -> Self {
        Self {
            user_id: cart.user_id,
            status: cart.status,
            total_items: cart.total_items,
            total_price: cart.total_price,
            created_at: cart.created_at,
            updated_at: cart.updated_at.clone(),
        }
    }

    pub(crate) fn into_cart(self, id: CartUuid) -> Cart {
        Cart {
            id,
            user_id: self.user_id,
            status: self.status,
            total_items: self.total_items,
            total_price: self.total_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Attributes written when totals are reconciled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalsRecord {
    #[serde(flatten)]
    pub totals: Totals,
    pub updated_at: VersionToken,
}

/// CartItem Record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRecord {
    pub cart_id: CartUuid,
    pub product_id: ProductUuid,
    pub quantity: Quantity,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub fixed_price: u64,
    #[serde(default = "epoch")]
    pub added_at: Timestamp,
    #[serde(default)]
    pub updated_at: VersionToken,
}

impl CartItemRecord {
    pub(crate) fn from_item(item: &CartItem) -> Self {
        Self {
            cart_id: item.cart_id,
            product_id: item.product_id,
            quantity: item.quantity,
            fixed_price: item.fixed_price,
            added_at: item.added_at,
            updated_at: item.updated_at.clone(),
        }
    }

    pub(crate) fn into_item(self, id: CartItemUuid) -> CartItem {
        CartItem {
            id,
            cart_id: self.cart_id,
            product_id: self.product_id,
            quantity: self.quantity,
            fixed_price: self.fixed_price,
            added_at: self.added_at,
            updated_at: self.updated_at,
        }
    }
}

/// Attributes written when an item's quantity changes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuantityRecord {
    pub quantity: Quantity,
    pub updated_at: VersionToken,
}

fn epoch() -> Timestamp {
    Timestamp::UNIX_EPOCH
}

/// Serialize a record into document attributes.
pub(crate) fn to_fields<T: Serialize>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Malformed(format!(
            "record serialized to {other}, expected an object"
        ))),
    }
}

/// Parse a document's id and attributes.
pub(crate) fn from_document<T, R>(document: Document) -> Result<(TypedUuid<T>, R), StoreError>
where
    R: for<'de> Deserialize<'de>,
{
    let id = document.id.parse().map_err(|error: uuid::Error| {
        StoreError::Malformed(format!("invalid document id {:?}: {error}", document.id))
    })?;

    let record = serde_json::from_value(Value::Object(document.fields))?;

    Ok((id, record))
}
