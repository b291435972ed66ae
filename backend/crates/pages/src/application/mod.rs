//! Application Layer
//!
//! Owner-scoped page use cases plus the anonymous public lookup.

pub mod check_slug;
pub mod create_page;
pub mod manage_page;
pub mod page_view;
pub mod public_page;

// Re-exports
pub use check_slug::{CheckSlugInput, CheckSlugOutput, CheckSlugUseCase};
pub use create_page::{CreatePageInput, CreatePageUseCase};
pub use manage_page::{
    DeletePageUseCase, GetPageUseCase, ListPagesUseCase, UpdatePageInput, UpdatePageUseCase,
};
pub use page_view::{PageView, PublicPageView};
pub use public_page::{PublicPageUseCase, RecordConversionUseCase};

use crate::domain::value_objects::{Slug, SlugError};
use crate::error::{PageError, PageResult};

/// Validate a slug coming from a request body
pub(crate) fn parse_slug(raw: &str) -> PageResult<Slug> {
    Slug::new(raw).map_err(|e| match e {
        SlugError::Empty => PageError::MissingField("slug"),
        other => PageError::InvalidSlug(other),
    })
}
