//! Products

use crate::uuids::TypedUuid;

/// Catalog product. Only its identity and price matter to carts.
#[derive(Debug)]
pub struct Product;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;
