//! Document Store Repository Implementation
//!
//! Pages live in the `landing-pages` collection with camelCase fields and
//! Unix-millisecond timestamps. The revision is the store's, not a field.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{Id, LandingPageId, UserId};
use platform::docstore::{DocStoreError, DocumentStore, Order, Query, StoredDocument, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::{DEFAULT_TEMPLATE, LandingPage};
use crate::domain::repository::PageRepository;
use crate::domain::value_objects::{PageStatus, Slug};
use crate::error::{PageError, PageResult};

pub const LANDING_PAGES: &str = "landing-pages";

/// Page repository backed by any [`DocumentStore`]
pub struct DocPageRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for DocPageRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> std::fmt::Debug for DocPageRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocPageRepository").finish_non_exhaustive()
    }
}

impl<S: DocumentStore> DocPageRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRecord {
    id: String,
    user_id: String,
    title: String,
    slug: String,
    #[serde(default = "default_template")]
    template: String,
    #[serde(default)]
    sections: Vec<Value>,
    #[serde(default)]
    settings: Map<String, Value>,
    #[serde(default)]
    status: PageStatus,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    conversions: u64,
    created_at: i64,
    updated_at: i64,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl PageRecord {
    fn from_entity(page: &LandingPage) -> Self {
        Self {
            id: page.page_id.to_string(),
            user_id: page.user_id.to_string(),
            title: page.title.clone(),
            slug: page.slug.as_str().to_string(),
            template: page.template.clone(),
            sections: page.sections.clone(),
            settings: page.settings.clone(),
            status: page.status,
            views: page.views,
            conversions: page.conversions,
            created_at: page.created_at.timestamp_millis(),
            updated_at: page.updated_at.timestamp_millis(),
        }
    }

    fn into_entity(self, revision: u64) -> PageResult<LandingPage> {
        Ok(LandingPage {
            page_id: parse_id(&self.id)?,
            user_id: parse_id(&self.user_id)?,
            title: self.title,
            slug: Slug::from_db(self.slug),
            template: self.template,
            sections: self.sections,
            settings: self.settings,
            status: self.status,
            views: self.views,
            conversions: self.conversions,
            revision,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

fn parse_id<T>(raw: &str) -> PageResult<Id<T>> {
    Id::parse(raw)
        .ok_or_else(|| PageError::Internal(format!("Malformed id in document store: {raw}")))
}

fn from_millis(ms: i64) -> PageResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| PageError::Internal(format!("Timestamp out of range: {ms}")))
}

fn decode_page(doc: &StoredDocument) -> PageResult<LandingPage> {
    doc.decode::<PageRecord>()?.into_entity(doc.revision)
}

fn map_write_error(err: DocStoreError) -> PageError {
    match err {
        // Unique slug index
        DocStoreError::AlreadyExists { .. } => PageError::SlugTaken,
        DocStoreError::NotFound { .. } => PageError::NotFound,
        DocStoreError::RevisionConflict {
            expected, actual, ..
        } => PageError::RevisionConflict { expected, actual },
        other => PageError::Store(other),
    }
}

impl<S: DocumentStore + Sync + 'static> PageRepository for DocPageRepository<S> {
    async fn create_page(&self, page: &LandingPage) -> PageResult<u64> {
        let data = encode(&PageRecord::from_entity(page))?;
        self.store
            .insert(LANDING_PAGES, &page.page_id.to_string(), data)
            .await
            .map_err(map_write_error)
    }

    async fn find_by_id(&self, page_id: &LandingPageId) -> PageResult<Option<LandingPage>> {
        self.store
            .get(LANDING_PAGES, &page_id.to_string())
            .await?
            .map(|doc| decode_page(&doc))
            .transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> PageResult<Option<LandingPage>> {
        let query = Query::new().eq("slug", slug.as_str()).limit(1);

        self.store
            .find(LANDING_PAGES, &query)
            .await?
            .first()
            .map(decode_page)
            .transpose()
    }

    async fn list_by_owner(&self, user_id: &UserId) -> PageResult<Vec<LandingPage>> {
        let query = Query::new()
            .eq("userId", user_id.to_string())
            .order_by("updatedAt", Order::Desc);

        self.store
            .find(LANDING_PAGES, &query)
            .await?
            .iter()
            .map(decode_page)
            .collect()
    }

    async fn update_page(
        &self,
        page: &LandingPage,
        expected_revision: Option<u64>,
    ) -> PageResult<u64> {
        let data = encode(&PageRecord::from_entity(page))?;
        self.store
            .update(
                LANDING_PAGES,
                &page.page_id.to_string(),
                data,
                expected_revision,
            )
            .await
            .map_err(map_write_error)
    }

    async fn delete_page(&self, page_id: &LandingPageId) -> PageResult<bool> {
        Ok(self
            .store
            .delete(LANDING_PAGES, &page_id.to_string())
            .await?)
    }
}
