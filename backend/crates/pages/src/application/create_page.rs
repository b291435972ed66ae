//! Create Page Use Case

use std::sync::Arc;

use kernel::id::UserId;
use serde_json::{Map, Value};

use crate::application::page_view::PageView;
use crate::application::parse_slug;
use crate::domain::entities::LandingPage;
use crate::domain::repository::PageRepository;
use crate::error::{PageError, PageResult};

/// Create page input
#[derive(Debug, Default)]
pub struct CreatePageInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub template: Option<String>,
    pub sections: Option<Vec<Value>>,
    pub settings: Option<Map<String, Value>>,
}

/// Create page use case
pub struct CreatePageUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> CreatePageUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, owner: &UserId, input: CreatePageInput) -> PageResult<PageView> {
        let title = input.title.ok_or(PageError::MissingField("title"))?;
        let slug = parse_slug(input.slug.as_deref().unwrap_or_default())?;

        let mut page = LandingPage::new(*owner, title, slug)?;

        if let Some(template) = input.template {
            page.set_template(template);
        }
        if let Some(sections) = input.sections {
            page.sections = sections;
        }
        if let Some(settings) = input.settings {
            page.settings = settings;
        }

        if self.repo.find_by_slug(&page.slug).await?.is_some() {
            return Err(PageError::SlugTaken);
        }

        page.revision = self.repo.create_page(&page).await?;

        tracing::info!(
            page_id = %page.page_id,
            user_id = %owner,
            slug = %page.slug,
            "Landing page created"
        );

        Ok(PageView::from(&page))
    }
}
