//! Domain Layer
//!
//! Landing page entity, value objects and the repository interface.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::LandingPage;
pub use repository::PageRepository;
pub use value_objects::{PageStatus, Slug, SlugError};
