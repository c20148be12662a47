//! Appwrite Databases REST client.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Document, DocumentStore, Fields, Filter, Page, StoreError};

/// Configuration for connecting to an Appwrite project.
#[derive(Clone)]
pub struct AppwriteConfig {
    /// API endpoint, e.g. `"https://cloud.appwrite.io/v1"`.
    pub endpoint: String,

    /// Project id, sent as `X-Appwrite-Project`.
    pub project: String,

    /// Server API key, sent as `X-Appwrite-Key`.
    pub api_key: String,

    /// Database id holding the collections.
    pub database: String,
}

impl std::fmt::Debug for AppwriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteConfig")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("api_key", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Document store backed by Appwrite Databases.
#[derive(Debug, Clone)]
pub struct AppwriteStore {
    config: AppwriteConfig,
    http: Client,
}

impl AppwriteStore {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: AppwriteConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{collection}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database,
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{id}", self.documents_url(collection))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("X-Appwrite-Project", &self.config.project)
            .header("X-Appwrite-Key", &self.config.api_key)
    }

    async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();

        Err(StoreError::from_status(status.as_u16(), text))
    }

    async fn document(request: RequestBuilder) -> Result<Document, StoreError> {
        let body: Value = Self::send(request).await?.json().await?;

        into_document(body)
    }
}

#[async_trait]
impl DocumentStore for AppwriteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let url = self.document_url(collection, id);

        Self::document(self.request(Method::GET, &url)).await
    }

    async fn list(
        &self,
        collection: &str,
        filters: &[Filter],
        page: Page,
    ) -> Result<Vec<Document>, StoreError> {
        let url = self.documents_url(collection);

        let queries: Vec<(&str, String)> = list_queries(filters, page)
            .into_iter()
            .map(|query| ("queries[]", query))
            .collect();

        let response: DocumentList = Self::send(self.request(Method::GET, &url).query(&queries))
            .await?
            .json()
            .await?;

        response.documents.into_iter().map(into_document).collect()
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let url = self.documents_url(collection);
        let body = json!({ "documentId": id, "data": fields });

        Self::document(self.request(Method::POST, &url).json(&body)).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let url = self.document_url(collection, id);
        let body = json!({ "data": fields });

        Self::document(self.request(Method::PATCH, &url).json(&body)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);

        Self::send(self.request(Method::DELETE, &url)).await?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<Value>,
}

/// Serialized Appwrite query strings for a filtered page.
fn list_queries(filters: &[Filter], page: Page) -> Vec<String> {
    filters
        .iter()
        .map(|filter| {
            json!({
                "method": "equal",
                "attribute": filter.field,
                "values": [filter.value],
            })
        })
        .chain([
            json!({ "method": "limit", "values": [page.limit] }),
            json!({ "method": "offset", "values": [page.offset] }),
        ])
        .map(|query| query.to_string())
        .collect()
}

/// Split an Appwrite document into its id and user attributes, dropping `$` metadata.
fn into_document(body: Value) -> Result<Document, StoreError> {
    let Value::Object(mut fields) = body else {
        return Err(StoreError::Malformed("document is not an object".to_string()));
    };

    let id = match fields.remove("$id") {
        Some(Value::String(id)) => id,
        _ => return Err(StoreError::Malformed("document has no $id".to_string())),
    };

    fields.retain(|key, _| !key.starts_with('$'));

    Ok(Document::new(id, fields))
}
