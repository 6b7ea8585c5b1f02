use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::store::{Document, DocumentStore, validate_document};
use crate::{Filter, Page, PageRequest, Result, Sort, SortDirection, StoreError};

/// Kind of driver operation recorded in the call journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    FindOne,
    FindMany,
    InsertOne,
    InsertMany,
    UpsertOne,
}

impl StoreOperation {
    fn is_write(self) -> bool {
        matches!(
            self,
            StoreOperation::InsertOne | StoreOperation::InsertMany | StoreOperation::UpsertOne
        )
    }
}

/// One entry of the call journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub operation: StoreOperation,
    pub collection: String,
}

#[derive(Debug, Default)]
struct InMemoryState {
    collections: HashMap<String, Vec<Document>>,
    calls: Vec<StoreCall>,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

/// In-memory document store for tests and local runs.
///
/// Behaves like the PostgreSQL driver and additionally records every call
/// it receives, so tests can assert which lookups a workflow performed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads documents into a collection without journaling the call.
    pub async fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        let mut state = self.state.write().await;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Returns a copy of every document in a collection, in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.state
            .read()
            .await
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Returns every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.read().await.calls.clone()
    }

    /// Returns the calls made against one collection.
    pub async fn calls_to(&self, collection: &str) -> Vec<StoreOperation> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|c| c.collection == collection)
            .map(|c| c.operation)
            .collect()
    }

    /// Makes every read from the collection fail until cleared.
    pub async fn fail_reads_from(&self, collection: &str) {
        self.state
            .write()
            .await
            .failing_reads
            .insert(collection.to_string());
    }

    /// Makes every write to the collection fail until cleared.
    pub async fn fail_writes_to(&self, collection: &str) {
        self.state
            .write()
            .await
            .failing_writes
            .insert(collection.to_string());
    }

    /// Removes all injected failures.
    pub async fn clear_failures(&self) {
        let mut state = self.state.write().await;
        state.failing_reads.clear();
        state.failing_writes.clear();
    }

    /// Clears all documents, calls and injected failures.
    pub async fn clear(&self) {
        *self.state.write().await = InMemoryState::default();
    }
}

impl InMemoryState {
    fn record(&mut self, operation: StoreOperation, collection: &str) -> Result<()> {
        self.calls.push(StoreCall {
            operation,
            collection: collection.to_string(),
        });

        let failing = if operation.is_write() {
            &self.failing_writes
        } else {
            &self.failing_reads
        };
        if failing.contains(collection) {
            return Err(StoreError::Backend(format!(
                "injected {operation:?} failure on collection '{collection}'"
            )));
        }
        Ok(())
    }
}

fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        // Missing fields sort first, like a null would.
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let mut state = self.state.write().await;
        state.record(StoreOperation::FindOne, collection)?;

        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
        page: PageRequest,
    ) -> Result<Page<Document>> {
        let mut state = self.state.write().await;
        state.record(StoreOperation::FindMany, collection)?;

        let mut matches: Vec<Document> = state
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = sort {
            // Stable sort keeps insertion order among equal keys.
            matches.sort_by(|a, b| {
                let ordering = compare_field(a, b, &sort.field);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let total = matches.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size).unwrap_or(usize::MAX);
        let items = matches.into_iter().skip(offset).take(size).collect();

        Ok(Page::new(items, total))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        validate_document(&document)?;

        let mut state = self.state.write().await;
        state.record(StoreOperation::InsertOne, collection)?;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<()> {
        for document in &documents {
            validate_document(document)?;
        }

        let mut state = self.state.write().await;
        state.record(StoreOperation::InsertMany, collection)?;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(())
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
    ) -> Result<()> {
        validate_document(&document)?;

        let mut state = self.state.write().await;
        state.record(StoreOperation::UpsertOne, collection)?;

        let docs = state.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| filter.matches(d)) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }
        Ok(())
    }
}
