//! Page Projections

use kernel::id::{LandingPageId, UserId};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::entities::LandingPage;
use crate::domain::value_objects::PageStatus;

/// Owner's view of a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub id: LandingPageId,
    pub user_id: UserId,
    pub title: String,
    pub slug: String,
    pub template: String,
    pub sections: Vec<Value>,
    pub settings: Map<String, Value>,
    pub status: PageStatus,
    pub views: u64,
    pub conversions: u64,
    /// Send back on update to guard against concurrent edits
    pub revision: u64,
    /// Unix milliseconds
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&LandingPage> for PageView {
    fn from(page: &LandingPage) -> Self {
        Self {
            id: page.page_id,
            user_id: page.user_id,
            title: page.title.clone(),
            slug: page.slug.as_str().to_string(),
            template: page.template.clone(),
            sections: page.sections.clone(),
            settings: page.settings.clone(),
            status: page.status,
            views: page.views,
            conversions: page.conversions,
            revision: page.revision,
            created_at: page.created_at.timestamp_millis(),
            updated_at: page.updated_at.timestamp_millis(),
        }
    }
}

/// What anonymous visitors of a published page get
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPageView {
    pub title: String,
    pub slug: String,
    pub template: String,
    pub sections: Vec<Value>,
    pub settings: Map<String, Value>,
}

impl From<&LandingPage> for PublicPageView {
    fn from(page: &LandingPage) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.as_str().to_string(),
            template: page.template.clone(),
            sections: page.sections.clone(),
            settings: page.settings.clone(),
        }
    }
}
