//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::PagesAppState;
pub use router::{landing_pages_router, public_pages_router};
