//! Owner-Scoped Page Use Cases
//!
//! Every operation loads the page first and compares its owner with the
//! caller: unknown id is `NotFound`, someone else's page is `Forbidden`.

use std::sync::Arc;

use kernel::id::{LandingPageId, UserId};
use serde_json::{Map, Value};

use crate::application::page_view::PageView;
use crate::application::parse_slug;
use crate::domain::entities::LandingPage;
use crate::domain::repository::PageRepository;
use crate::domain::value_objects::PageStatus;
use crate::error::{PageError, PageResult};

/// Load a page and check that `owner` may touch it
async fn load_owned<R>(repo: &R, owner: &UserId, page_id: &LandingPageId) -> PageResult<LandingPage>
where
    R: PageRepository,
{
    let page = repo.find_by_id(page_id).await?.ok_or(PageError::NotFound)?;

    if !page.is_owned_by(owner) {
        tracing::warn!(
            page_id = %page_id,
            user_id = %owner,
            "Landing page accessed by non-owner"
        );
        return Err(PageError::Forbidden);
    }

    Ok(page)
}

// ============================================================================
// List
// ============================================================================

/// List the caller's pages
pub struct ListPagesUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> ListPagesUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, owner: &UserId) -> PageResult<Vec<PageView>> {
        let pages = self.repo.list_by_owner(owner).await?;
        Ok(pages.iter().map(PageView::from).collect())
    }
}

// ============================================================================
// Get
// ============================================================================

/// Read one of the caller's pages
pub struct GetPageUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> GetPageUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, owner: &UserId, page_id: &LandingPageId) -> PageResult<PageView> {
        let page = load_owned(self.repo.as_ref(), owner, page_id).await?;
        Ok(PageView::from(&page))
    }
}

// ============================================================================
// Update
// ============================================================================

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdatePageInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub template: Option<String>,
    pub sections: Option<Vec<Value>>,
    pub settings: Option<Map<String, Value>>,
    pub status: Option<PageStatus>,
    /// Revision the client last read; the write fails if the page moved on
    pub revision: Option<u64>,
}

/// Update one of the caller's pages
pub struct UpdatePageUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> UpdatePageUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        owner: &UserId,
        page_id: &LandingPageId,
        input: UpdatePageInput,
    ) -> PageResult<PageView> {
        let mut page = load_owned(self.repo.as_ref(), owner, page_id).await?;

        if let Some(expected) = input.revision {
            if expected != page.revision {
                return Err(PageError::RevisionConflict {
                    expected,
                    actual: page.revision,
                });
            }
        }

        if let Some(title) = input.title {
            page.title = LandingPage::validate_title(title)?;
        }

        if let Some(raw) = input.slug {
            let slug = parse_slug(&raw)?;
            if slug != page.slug {
                let holder = self.repo.find_by_slug(&slug).await?;
                if holder.is_some_and(|other| other.page_id != page.page_id) {
                    return Err(PageError::SlugTaken);
                }
                page.slug = slug;
            }
        }

        if let Some(template) = input.template {
            page.set_template(template);
        }
        if let Some(sections) = input.sections {
            page.sections = sections;
        }
        if let Some(settings) = input.settings {
            page.settings = settings;
        }
        if let Some(status) = input.status {
            page.status = status;
        }

        page.touch();
        page.revision = self.repo.update_page(&page, input.revision).await?;

        tracing::info!(
            page_id = %page.page_id,
            revision = page.revision,
            status = %page.status,
            "Landing page updated"
        );

        Ok(PageView::from(&page))
    }
}

// ============================================================================
// Delete
// ============================================================================

/// Delete one of the caller's pages
pub struct DeletePageUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> DeletePageUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, owner: &UserId, page_id: &LandingPageId) -> PageResult<()> {
        load_owned(self.repo.as_ref(), owner, page_id).await?;

        // Lost a race with another delete
        if !self.repo.delete_page(page_id).await? {
            return Err(PageError::NotFound);
        }

        tracing::info!(page_id = %page_id, user_id = %owner, "Landing page deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::create_page::{CreatePageInput, CreatePageUseCase};
    use crate::infra::DocPageRepository;
    use platform::docstore::MemoryDocumentStore;

    type Repo = DocPageRepository<MemoryDocumentStore>;

    fn repo() -> Arc<Repo> {
        Arc::new(DocPageRepository::new(Arc::new(MemoryDocumentStore::new())))
    }

    async fn create(repo: &Arc<Repo>, owner: &UserId, slug: &str) -> PageView {
        CreatePageUseCase::new(repo.clone())
            .execute(
                owner,
                CreatePageInput {
                    title: Some(format!("Page {slug}")),
                    slug: Some(slug.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_other_owner_is_forbidden() {
        let repo = repo();
        let owner = UserId::new();
        let intruder = UserId::new();
        let page = create(&repo, &owner, "mine").await;

        assert!(matches!(
            GetPageUseCase::new(repo.clone()).execute(&intruder, &page.id).await,
            Err(PageError::Forbidden)
        ));
        assert!(matches!(
            UpdatePageUseCase::new(repo.clone())
                .execute(&intruder, &page.id, UpdatePageInput::default())
                .await,
            Err(PageError::Forbidden)
        ));
        assert!(matches!(
            DeletePageUseCase::new(repo.clone()).execute(&intruder, &page.id).await,
            Err(PageError::Forbidden)
        ));

        // Untouched
        let view = GetPageUseCase::new(repo).execute(&owner, &page.id).await.unwrap();
        assert_eq!(view.revision, 1);
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let repo = repo();
        let result = GetPageUseCase::new(repo)
            .execute(&UserId::new(), &LandingPageId::new())
            .await;
        assert!(matches!(result, Err(PageError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_with_stale_revision_conflicts() {
        let repo = repo();
        let owner = UserId::new();
        let page = create(&repo, &owner, "promo").await;
        let use_case = UpdatePageUseCase::new(repo.clone());

        let updated = use_case
            .execute(
                &owner,
                &page.id,
                UpdatePageInput {
                    title: Some("Renamed".into()),
                    status: Some(PageStatus::Published),
                    revision: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.revision, 2);
        assert_eq!(updated.status, PageStatus::Published);

        let stale = use_case
            .execute(
                &owner,
                &page.id,
                UpdatePageInput {
                    title: Some("Stale".into()),
                    revision: Some(1),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(
            stale,
            Err(PageError::RevisionConflict {
                expected: 1,
                actual: 2
            })
        ));

        // Without a revision the last writer wins
        let blind = use_case
            .execute(
                &owner,
                &page.id,
                UpdatePageInput {
                    title: Some("Blind".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(blind.title, "Blind");
        assert_eq!(blind.revision, 3);
    }

    #[tokio::test]
    async fn test_update_slug() {
        let repo = repo();
        let owner = UserId::new();
        let first = create(&repo, &owner, "first").await;
        create(&repo, &UserId::new(), "taken").await;
        let use_case = UpdatePageUseCase::new(repo.clone());

        let slug = |s: &str| UpdatePageInput {
            slug: Some(s.to_string()),
            ..Default::default()
        };

        assert!(matches!(
            use_case.execute(&owner, &first.id, slug("taken")).await,
            Err(PageError::SlugTaken)
        ));
        assert!(matches!(
            use_case.execute(&owner, &first.id, slug("x")).await,
            Err(PageError::InvalidSlug(_))
        ));

        // Keeping the current slug is not a conflict
        use_case.execute(&owner, &first.id, slug("first")).await.unwrap();

        let moved = use_case
            .execute(&owner, &first.id, slug("renamed"))
            .await
            .unwrap();
        assert_eq!(moved.slug, "renamed");
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_recent_first() {
        let repo = repo();
        let owner = UserId::new();
        let older = create(&repo, &owner, "older").await;
        let newer = create(&repo, &owner, "newer").await;
        create(&repo, &UserId::new(), "theirs").await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        UpdatePageUseCase::new(repo.clone())
            .execute(&owner, &older.id, UpdatePageInput::default())
            .await
            .unwrap();

        let pages = ListPagesUseCase::new(repo).execute(&owner).await.unwrap();
        let ids: Vec<_> = pages.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        let owner = UserId::new();
        let page = create(&repo, &owner, "promo").await;
        let use_case = DeletePageUseCase::new(repo.clone());

        use_case.execute(&owner, &page.id).await.unwrap();
        assert!(matches!(
            use_case.execute(&owner, &page.id).await,
            Err(PageError::NotFound)
        ));
    }
}
