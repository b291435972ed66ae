//! Landing Pages Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Landing page entity, slug rules, repository trait
//! - `application/` - Owner-scoped CRUD, slug availability, public lookup
//! - `infra/` - Document store implementation
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! Every `/api/landing-pages` route runs behind `auth::middleware::require_user`;
//! a page is only visible to the user whose id it carries. Published pages
//! are also readable by slug without a session.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{PageError, PageResult};
pub use infra::DocPageRepository;
pub use presentation::{PagesAppState, landing_pages_router, public_pages_router};
