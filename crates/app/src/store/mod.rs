//! Document store contract.
//!
//! The engine persists carts and cart items in a document store that offers single-document
//! reads and writes, equality filters and offset pagination, but no transactions and no
//! conditional writes. Everything above this module is written against [`DocumentStore`].

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::{Map, Value};

mod appwrite;
mod errors;
mod memory;
pub(crate) mod values;

pub use appwrite::{AppwriteConfig, AppwriteStore};
pub use errors::StoreError;
pub use memory::InMemoryStore;

/// Document attributes, without the document id.
pub type Fields = Map<String, Value>;

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Equality filter on a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    #[must_use]
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// First page of the given size.
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    /// The page following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }
}

/// Collection ids used by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub carts: String,
    pub cart_items: String,
    pub products: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            carts: "carts".to_string(),
            cart_items: "cart_items".to_string(),
            products: "products".to_string(),
        }
    }
}

/// Single-document store without transactions.
#[automock]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// List documents matching every filter, in insertion order.
    async fn list(
        &self,
        collection: &str,
        filters: &[Filter],
        page: Page,
    ) -> Result<Vec<Document>, StoreError>;

    /// Create a document with a caller-chosen id. An existing id is a conflict.
    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    /// Merge the given fields into an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    /// Delete a document by id.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Read every matching document, page by page, until a short page is returned.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn list_all(
    store: &dyn DocumentStore,
    collection: &str,
    filters: &[Filter],
    batch_size: usize,
) -> Result<Vec<Document>, StoreError> {
    let mut documents = Vec::new();
    let mut page = Page::first(batch_size.max(1));

    loop {
        let batch = store.list(collection, filters, page).await?;
        let exhausted = batch.len() < page.limit;

        documents.extend(batch);

        if exhausted {
            return Ok(documents);
        }

        page = page.next();
    }
}

/// Which store backend to run against.
#[derive(Debug, Clone)]
pub enum StoreSettings {
    /// Process-local store; state is lost on restart.
    Memory,

    /// Appwrite Databases over REST.
    Appwrite(AppwriteConfig),
}

/// Build a store for the given settings.
#[must_use]
pub fn connect(settings: StoreSettings) -> Arc<dyn DocumentStore> {
    match settings {
        StoreSettings::Memory => Arc::new(InMemoryStore::new()),
        StoreSettings::Appwrite(config) => Arc::new(AppwriteStore::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[test]
    fn filter_matches_equal_values_only() {
        let filter = Filter::equal("cartId", "abc");

        assert!(filter.matches(&fields(json!({ "cartId": "abc" }))));
        assert!(!filter.matches(&fields(json!({ "cartId": "xyz" }))));
        assert!(!filter.matches(&fields(json!({}))));
    }

    #[test]
    fn page_advances_by_limit() {
        let page = Page::first(100).next().next();

        assert_eq!(
            page,
            Page {
                limit: 100,
                offset: 200,
            }
        );
    }

    #[tokio::test]
    async fn list_all_walks_every_page() -> TestResult {
        let store = InMemoryStore::new();

        for index in 0..7 {
            store
                .create(
                    "items",
                    &format!("item-{index}"),
                    fields(json!({ "cartId": "cart", "index": index })),
                )
                .await?;
        }

        store
            .create("items", "other", fields(json!({ "cartId": "other" })))
            .await?;

        let documents = list_all(&store, "items", &[Filter::equal("cartId", "cart")], 3).await?;

        let ids: Vec<&str> = documents.iter().map(|doc| doc.id.as_str()).collect();

        assert_eq!(
            ids,
            ["item-0", "item-1", "item-2", "item-3", "item-4", "item-5", "item-6"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_all_stops_on_exact_multiple() -> TestResult {
        let mut store = MockDocumentStore::new();
        let mut calls = 0;

        store
            .expect_list()
            .times(3)
            .returning(move |_, _, page| {
                calls += 1;

                let count = if calls < 3 { page.limit } else { 0 };

                Ok((0..count)
                    .map(|index| Document::new(format!("{}", page.offset + index), Fields::new()))
                    .collect())
            });

        let documents = list_all(&store, "items", &[], 2).await?;

        assert_eq!(documents.len(), 4);

        Ok(())
    }
}
