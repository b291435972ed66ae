//! Repository Traits

use kernel::id::{LandingPageId, UserId};

use crate::domain::entities::LandingPage;
use crate::domain::value_objects::Slug;
use crate::error::PageResult;

/// Landing page repository trait
#[trait_variant::make(PageRepository: Send)]
pub trait LocalPageRepository {
    /// Insert a new page, `SlugTaken` when another page has the slug
    async fn create_page(&self, page: &LandingPage) -> PageResult<u64>;

    async fn find_by_id(&self, page_id: &LandingPageId) -> PageResult<Option<LandingPage>>;

    async fn find_by_slug(&self, slug: &Slug) -> PageResult<Option<LandingPage>>;

    /// Pages of one owner, most recently updated first
    async fn list_by_owner(&self, user_id: &UserId) -> PageResult<Vec<LandingPage>>;

    /// Replace a page, returns the new revision
    ///
    /// With `expected_revision` set the write only succeeds if the stored
    /// revision still matches (`RevisionConflict` otherwise).
    async fn update_page(
        &self,
        page: &LandingPage,
        expected_revision: Option<u64>,
    ) -> PageResult<u64>;

    /// `false` when the page was already gone
    async fn delete_page(&self, page_id: &LandingPageId) -> PageResult<bool>;
}
