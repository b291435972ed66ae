//! Public Page Use Cases
//!
//! Anonymous access to published pages. Counter writes carry the revision
//! they were read at, so they never overwrite an owner's edit; on a
//! conflict the page is read again and the increment retried.

use std::sync::Arc;

use crate::application::page_view::PublicPageView;
use crate::domain::entities::LandingPage;
use crate::domain::repository::PageRepository;
use crate::domain::value_objects::Slug;
use crate::error::{PageError, PageResult};

/// Read-increment-write rounds before giving up on a counter
pub const COUNTER_WRITE_ATTEMPTS: usize = 3;

/// Only published pages are visible; anything else looks absent
async fn load_published<R>(repo: &R, raw_slug: &str) -> PageResult<LandingPage>
where
    R: PageRepository,
{
    let slug = Slug::new(raw_slug).map_err(|_| PageError::NotFound)?;

    repo.find_by_slug(&slug)
        .await?
        .filter(LandingPage::is_published)
        .ok_or(PageError::NotFound)
}

/// Apply `bump` to the current published page and write it back
///
/// Returns the page as written. `NotFound` when the page stopped being
/// published in between; `RevisionConflict` once every attempt lost.
async fn increment<R, F>(repo: &R, slug: &str, bump: F) -> PageResult<LandingPage>
where
    R: PageRepository,
    F: Fn(&mut LandingPage),
{
    let mut attempt = 1;

    loop {
        let mut page = load_published(repo, slug).await?;
        bump(&mut page);

        match repo.update_page(&page, Some(page.revision)).await {
            Ok(revision) => {
                page.revision = revision;
                return Ok(page);
            }
            Err(PageError::RevisionConflict { .. }) if attempt < COUNTER_WRITE_ATTEMPTS => {
                tracing::debug!(page_id = %page.page_id, attempt, "Counter write raced an edit");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Serve a published page and count the view
pub struct PublicPageUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> PublicPageUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, slug: &str) -> PageResult<PublicPageView> {
        match increment(self.repo.as_ref(), slug, |page| page.views += 1).await {
            Ok(page) => Ok(PublicPageView::from(&page)),
            Err(PageError::NotFound) => Err(PageError::NotFound),
            Err(e) => {
                // The view goes uncounted, the visitor still gets the page
                tracing::warn!(slug, error = %e, "Failed to count page view");
                let page = load_published(self.repo.as_ref(), slug).await?;
                Ok(PublicPageView::from(&page))
            }
        }
    }
}

/// Count a conversion on a published page, returns the new total
pub struct RecordConversionUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> RecordConversionUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, slug: &str) -> PageResult<u64> {
        let page = increment(self.repo.as_ref(), slug, |page| page.conversions += 1).await?;

        tracing::debug!(
            page_id = %page.page_id,
            conversions = page.conversions,
            "Conversion recorded"
        );

        Ok(page.conversions)
    }
}
