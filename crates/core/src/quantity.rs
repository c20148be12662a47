//! Item quantities

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a quantity falls outside `1..=999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quantity {value} is outside the allowed range {min}..={max}")]
pub struct QuantityError {
    /// The rejected value.
    pub value: i64,

    /// Smallest allowed quantity.
    pub min: u16,

    /// Largest allowed quantity.
    pub max: u16,
}

/// Quantity of a single cart line, always within `1..=999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct Quantity(u16);

impl Quantity {
    /// Smallest quantity a cart line can hold.
    pub const MIN: Self = Self(1);

    /// Largest quantity a cart line can hold.
    pub const MAX: Self = Self(999);

    /// Validate a raw quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] when `value` is outside `1..=999`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        match u16::try_from(value) {
            Ok(raw) if (Self::MIN.0..=Self::MAX.0).contains(&raw) => Ok(Self(raw)),
            _ => Err(QuantityError {
                value,
                min: Self::MIN.0,
                max: Self::MAX.0,
            }),
        }
    }

    /// Clamp any integer into `1..=999`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));

        // The clamp keeps the value inside u16 range.
        Self(u16::try_from(clamped).unwrap_or(Self::MAX.0))
    }

    /// Apply a signed delta, saturating at the bounds.
    #[must_use]
    pub fn saturating_add(self, delta: i64) -> Self {
        Self::clamped(i64::from(self.0).saturating_add(delta))
    }

    /// The raw quantity.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u16 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        u64::from(value.0)
    }
}
