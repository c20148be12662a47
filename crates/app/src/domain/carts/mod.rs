//! Carts

pub mod data;
pub mod errors;
pub mod quantity;
pub mod reconciler;
mod records;
pub(crate) mod repositories;
pub mod service;

pub use data::{NewCartItem, RemoveOutcome};
pub use errors::CartsServiceError;
pub use quantity::QuantityUpdater;
pub use reconciler::TotalsReconciler;
pub use service::*;
