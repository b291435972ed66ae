//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{LandingPageId, UserId};
use serde_json::{Map, Value};

use crate::domain::value_objects::{PageStatus, Slug};
use crate::error::{PageError, PageResult};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const DEFAULT_TEMPLATE: &str = "default";

/// Landing page entity
#[derive(Debug, Clone)]
pub struct LandingPage {
    pub page_id: LandingPageId,
    /// Owner
    pub user_id: UserId,
    pub title: String,
    pub slug: Slug,
    pub template: String,
    /// Opaque section blocks, rendered by the frontend
    pub sections: Vec<Value>,
    pub settings: Map<String, Value>,
    pub status: PageStatus,
    pub views: u64,
    pub conversions: u64,
    /// Store revision at read time, 0 before the first insert
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LandingPage {
    /// New draft page with zeroed counters
    pub fn new(user_id: UserId, title: String, slug: Slug) -> PageResult<Self> {
        let title = Self::validate_title(title)?;
        let now = Utc::now();

        Ok(Self {
            page_id: LandingPageId::new(),
            user_id,
            title,
            slug,
            template: DEFAULT_TEMPLATE.to_string(),
            sections: Vec::new(),
            settings: Map::new(),
            status: PageStatus::Draft,
            views: 0,
            conversions: 0,
            revision: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Trimmed, 1..=200 characters
    pub fn validate_title(title: String) -> PageResult<String> {
        let title = title.trim();

        if title.is_empty() {
            return Err(PageError::MissingField("title"));
        }

        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(PageError::Validation(format!(
                "Title must be at most {TITLE_MAX_LENGTH} characters"
            )));
        }

        Ok(title.to_string())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }

    /// Blank templates fall back to the default one
    pub fn set_template(&mut self, template: String) {
        let template = template.trim();
        self.template = if template.is_empty() {
            DEFAULT_TEMPLATE.to_string()
        } else {
            template.to_string()
        };
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
