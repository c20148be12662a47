//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Document, DocumentStore, Fields, Filter, Page, StoreError};

/// Document store held in memory.
///
/// Every operation is atomic on its own, and nothing spans operations, so it shows the same
/// interleavings as a remote store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
}

#[derive(Debug, Default)]
struct Collection {
    next_sequence: u64,
    documents: HashMap<String, Stored>,
}

#[derive(Debug)]
struct Stored {
    sequence: u64,
    fields: Fields,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, |collection| collection.documents.len())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let collections = self.collections.lock().await;

        collections
            .get(collection)
            .and_then(|collection| collection.documents.get(id))
            .map(|stored| Document::new(id, stored.fields.clone()))
            .ok_or(StoreError::NotFound)
    }

    async fn list(
        &self,
        collection: &str,
        filters: &[Filter],
        page: Page,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().await;

        let Some(collection) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<(&String, &Stored)> = collection
            .documents
            .iter()
            .filter(|(_, stored)| filters.iter().all(|filter| filter.matches(&stored.fields)))
            .collect();

        matches.sort_by_key(|(_, stored)| stored.sequence);

        Ok(matches
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .map(|(id, stored)| Document::new(id.clone(), stored.fields.clone()))
            .collect())
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.lock().await;
        let collection = collections.entry(collection.to_string()).or_default();

        if collection.documents.contains_key(id) {
            return Err(StoreError::Conflict);
        }

        let sequence = collection.next_sequence;
        collection.next_sequence += 1;

        collection.documents.insert(
            id.to_string(),
            Stored {
                sequence,
                fields: fields.clone(),
            },
        );

        Ok(Document::new(id, fields))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.lock().await;

        let stored = collections
            .get_mut(collection)
            .and_then(|collection| collection.documents.get_mut(id))
            .ok_or(StoreError::NotFound)?;

        stored.fields.extend(fields);

        Ok(Document::new(id, stored.fields.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;

        collections
            .get_mut(collection)
            .and_then(|collection| collection.documents.remove(id))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
