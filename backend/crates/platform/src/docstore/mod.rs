//! Document Store Adapter
//!
//! A minimal collection/document interface over JSON documents:
//! point reads, equality and less-than filtered queries with ordering and
//! limits, revision-checked updates and deletes.
//!
//! Two backends:
//! - [`PgDocumentStore`] - Postgres `documents` table with a JSONB payload
//! - [`MemoryDocumentStore`] - `DashMap`-backed, for development and tests
//!
//! The store is constructed once at startup and injected; nothing in this
//! module holds global state.

pub mod memory;
pub mod postgres;
pub mod query;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use query::{Filter, Order, Query};

use serde_json::Value;
use thiserror::Error;

/// Document store result type alias
pub type DocStoreResult<T> = Result<T, DocStoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum DocStoreError {
    /// No document with this id in the collection
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// Id or a unique field already taken
    #[error("Document {collection}/{id} conflicts with an existing document")]
    AlreadyExists { collection: String, id: String },

    /// Optimistic concurrency check failed
    #[error("Revision conflict on {collection}/{id}: expected {expected}, found {actual}")]
    RevisionConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// Payload is not a JSON object
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Backend failure (connection, protocol, SQL)
    #[error("Document store backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// A document as read from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    /// Starts at 1, incremented by every update
    pub revision: u64,
    pub data: Value,
}

impl StoredDocument {
    /// Deserialize the payload into a typed record
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> DocStoreResult<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            DocStoreError::InvalidDocument(format!("{} does not decode: {e}", self.id))
        })
    }
}

/// Serialize a typed record into a document payload
pub fn encode<T: serde::Serialize>(record: &T) -> DocStoreResult<Value> {
    let value =
        serde_json::to_value(record).map_err(|e| DocStoreError::InvalidDocument(e.to_string()))?;

    if !value.is_object() {
        return Err(DocStoreError::InvalidDocument(
            "document payload must be a JSON object".to_string(),
        ));
    }

    Ok(value)
}

/// Document store trait
#[trait_variant::make(DocumentStore: Send)]
pub trait LocalDocumentStore {
    /// Insert a new document, returns its revision (1)
    async fn insert(&self, collection: &str, id: &str, data: Value) -> DocStoreResult<u64>;

    /// Point read by id
    async fn get(&self, collection: &str, id: &str) -> DocStoreResult<Option<StoredDocument>>;

    /// Filtered read
    async fn find(&self, collection: &str, query: &Query) -> DocStoreResult<Vec<StoredDocument>>;

    /// Replace a document's payload, returns the new revision
    ///
    /// When `expected_revision` is `Some`, the write only happens if the
    /// stored revision still matches.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        expected_revision: Option<u64>,
    ) -> DocStoreResult<u64>;

    /// Delete by id, `false` when nothing was there
    async fn delete(&self, collection: &str, id: &str) -> DocStoreResult<bool>;

    /// Delete every document matching the query filters
    async fn delete_where(&self, collection: &str, query: &Query) -> DocStoreResult<u64>;
}
