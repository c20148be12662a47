//! Cart Repositories

mod carts;
mod items;

pub(crate) use carts::CartsRepository;
pub(crate) use items::CartItemsRepository;

/// Page size used when walking a collection.
pub(crate) const LIST_BATCH_SIZE: usize = 100;
