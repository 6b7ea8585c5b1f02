use std::sync::Arc;

use async_trait::async_trait;

use crate::{Filter, Page, PageRequest, Result, Sort, StoreError};

/// A stored document. Always a JSON object.
pub type Document = serde_json::Value;

/// Core trait for document-store drivers.
///
/// Documents are grouped in named collections. All implementations must be
/// thread-safe (Send + Sync); callers share a driver across tasks by
/// cloning it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document matching the filter, if any.
    ///
    /// Finding nothing is not an error.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    /// Returns one window of the documents matching the filter.
    ///
    /// `Page::total` counts every match, not only the returned window.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
        page: PageRequest,
    ) -> Result<Page<Document>>;

    /// Inserts a single document.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<()>;

    /// Inserts several documents in one operation.
    ///
    /// An empty batch is a no-op.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<()>;

    /// Replaces the first document matching the filter, or inserts the
    /// document when nothing matches.
    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
    ) -> Result<()>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        (**self).find_one(collection, filter).await
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
        page: PageRequest,
    ) -> Result<Page<Document>> {
        (**self).find_many(collection, filter, sort, page).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        (**self).insert_one(collection, document).await
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<()> {
        (**self).insert_many(collection, documents).await
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
    ) -> Result<()> {
        (**self).upsert_one(collection, filter, document).await
    }
}

/// Rejects documents that are not JSON objects.
pub fn validate_document(document: &Document) -> Result<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(StoreError::Backend(format!(
            "documents must be JSON objects, got: {document}"
        )))
    }
}
