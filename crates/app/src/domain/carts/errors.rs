//! Carts service errors.

use thiserror::Error;
use trolley::{CartStatus, QuantityError};

use crate::{domain::products::ProductsServiceError, store::StoreError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart belongs to another user")]
    Forbidden,

    #[error("cart is {0}")]
    Inactive(CartStatus),

    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),

    #[error("cart was modified concurrently; gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("product lookup failed")]
    Products(#[source] ProductsServiceError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl CartsServiceError {
    /// Whether the caller may reasonably retry the whole request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RetriesExhausted { .. } => true,
            Self::Store(error) | Self::Products(ProductsServiceError::Store(error)) => {
                error.is_transient()
            }
            _ => false,
        }
    }
}

impl From<StoreError> for CartsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl From<ProductsServiceError> for CartsServiceError {
    fn from(error: ProductsServiceError) -> Self {
        match error {
            ProductsServiceError::NotFound => Self::ProductNotFound,
            other => Self::Products(other),
        }
    }
}
