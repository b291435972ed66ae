//! Slug Availability Use Case
//!
//! Editors call this while typing, so an invalid slug is an answer
//! (`available: false` plus the reason), not an error.

use std::sync::Arc;

use kernel::id::{LandingPageId, UserId};
use serde::Serialize;

use crate::domain::repository::PageRepository;
use crate::domain::value_objects::Slug;
use crate::error::PageResult;

/// Check slug input
#[derive(Debug, Default)]
pub struct CheckSlugInput {
    pub slug: String,
    /// The caller's page being edited; its own slug counts as available
    pub exclude_id: Option<LandingPageId>,
}

/// Check slug result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSlugOutput {
    pub slug: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Check slug use case
pub struct CheckSlugUseCase<R>
where
    R: PageRepository,
{
    repo: Arc<R>,
}

impl<R> CheckSlugUseCase<R>
where
    R: PageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        caller: &UserId,
        input: CheckSlugInput,
    ) -> PageResult<CheckSlugOutput> {
        let slug = match Slug::new(&input.slug) {
            Ok(slug) => slug,
            Err(e) => {
                return Ok(CheckSlugOutput {
                    slug: input.slug.trim().to_string(),
                    available: false,
                    reason: Some(e.to_string()),
                });
            }
        };

        let available = match self.repo.find_by_slug(&slug).await? {
            None => true,
            Some(holder) => {
                input.exclude_id == Some(holder.page_id) && holder.is_owned_by(caller)
            }
        };

        Ok(CheckSlugOutput {
            slug: slug.as_str().to_string(),
            available,
            reason: (!available).then(|| "Slug is already taken".to_string()),
        })
    }
}
