//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user, `EmailTaken` when the email is registered
    async fn create_user(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by exact (normalized) email, first match
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Replace a user's profile
    async fn update_user(&self, user: &User) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a new session
    async fn create_session(&self, session: &Session) -> AuthResult<()>;

    /// Find the session whose token digest matches
    async fn find_by_token_hash(&self, token_hash: &str) -> AuthResult<Option<Session>>;

    /// Delete one session, `false` when it was already gone
    async fn delete_session(&self, session: &Session) -> AuthResult<bool>;

    /// Delete every session of a user, returns the count
    async fn delete_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// Delete every session past its expiry, returns the count
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
