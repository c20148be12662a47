//! Cart aggregate totals

use serde::{Deserialize, Serialize};

use crate::{carts::CartItem, quantity::Quantity};

/// Aggregate fields of a cart: item count and price in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of item quantities.
    pub total_items: u64,

    /// Sum of `quantity * fixed_price`.
    pub total_price: u64,
}

impl Totals {
    /// Sum `(quantity, unit price)` lines.
    #[must_use]
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Quantity, u64)>,
    {
        lines
            .into_iter()
            .fold(Self::default(), |totals, (quantity, price)| {
                let quantity = u64::from(quantity);

                Self {
                    total_items: totals.total_items.saturating_add(quantity),
                    total_price: totals
                        .total_price
                        .saturating_add(quantity.saturating_mul(price)),
                }
            })
    }

    /// Sum the lines of the given cart items.
    #[must_use]
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a CartItem>,
    {
        Self::from_lines(
            items
                .into_iter()
                .map(|item| (item.quantity, item.fixed_price)),
        )
    }
}
