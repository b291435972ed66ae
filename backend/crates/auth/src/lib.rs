//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Document store implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Login/logout with email + password, server-side sessions behind a
//!   `session_token` cookie
//! - Session authenticator shared with other crates (`require_user`)
//! - Signup and own-profile read/update
//! - Path-prefix access control for page navigation
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Session tokens are 256-bit random values; only their SHA-256 is stored
//! - Sessions expire after 24 hours and are deleted when found expired

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::AuthenticatedUser;
pub use domain::repository::{SessionRepository, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::DocAuthRepository;
pub use presentation::{AuthAppState, auth_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
