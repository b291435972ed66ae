//! In-memory document store
//!
//! Used when no database is configured in development builds, and by tests.
//! Per-document revision checks are atomic: `DashMap` holds the shard lock
//! for the duration of `get_mut`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use super::{DocStoreError, DocStoreResult, DocumentStore, Query, StoredDocument};

/// `DashMap`-backed document store keyed by `(collection, id)`
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: DashMap<(String, String), StoredDocument>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.docs
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count()
    }

    fn key(collection: &str, id: &str) -> (String, String) {
        (collection.to_string(), id.to_string())
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, id: &str, data: Value) -> DocStoreResult<u64> {
        if !data.is_object() {
            return Err(DocStoreError::InvalidDocument(
                "document payload must be a JSON object".to_string(),
            ));
        }

        match self.docs.entry(Self::key(collection, id)) {
            Entry::Occupied(_) => Err(DocStoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(StoredDocument {
                    id: id.to_string(),
                    revision: 1,
                    data,
                });
                Ok(1)
            }
        }
    }

    async fn get(&self, collection: &str, id: &str) -> DocStoreResult<Option<StoredDocument>> {
        Ok(self
            .docs
            .get(&Self::key(collection, id))
            .map(|doc| doc.value().clone()))
    }

    async fn find(&self, collection: &str, query: &Query) -> DocStoreResult<Vec<StoredDocument>> {
        let mut found: Vec<StoredDocument> = self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection && query.matches(&entry.value().data))
            .map(|entry| entry.value().clone())
            .collect();

        found.sort_by(|a, b| query.compare(&a.data, &b.data).then_with(|| a.id.cmp(&b.id)));

        if let Some(limit) = query.limit_value() {
            found.truncate(limit);
        }

        Ok(found)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        expected_revision: Option<u64>,
    ) -> DocStoreResult<u64> {
        if !data.is_object() {
            return Err(DocStoreError::InvalidDocument(
                "document payload must be a JSON object".to_string(),
            ));
        }

        let mut doc = self
            .docs
            .get_mut(&Self::key(collection, id))
            .ok_or_else(|| DocStoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        if let Some(expected) = expected_revision {
            if doc.revision != expected {
                return Err(DocStoreError::RevisionConflict {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    expected,
                    actual: doc.revision,
                });
            }
        }

        doc.revision += 1;
        doc.data = data;
        Ok(doc.revision)
    }

    async fn delete(&self, collection: &str, id: &str) -> DocStoreResult<bool> {
        Ok(self.docs.remove(&Self::key(collection, id)).is_some())
    }

    async fn delete_where(&self, collection: &str, query: &Query) -> DocStoreResult<u64> {
        let mut deleted = 0u64;
        self.docs.retain(|(doc_collection, _), doc| {
            let hit = doc_collection == collection && query.matches(&doc.data);
            if hit {
                deleted += 1;
            }
            !hit
        });
        Ok(deleted)
    }
}
