//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Sign out from the session behind `token`
    ///
    /// A token with no session is not an error. Returns whether a session
    /// was removed.
    pub async fn execute(&self, token: &str) -> AuthResult<bool> {
        let token = SessionToken::from_client(token);

        let Some(session) = self.session_repo.find_by_token_hash(&token.hash()).await? else {
            return Ok(false);
        };

        let deleted = self.session_repo.delete_session(&session).await?;

        tracing::info!(
            session_id = %session.session_id,
            user_id = %session.user_id,
            "User signed out"
        );

        Ok(deleted)
    }

    /// Sign out from every session of a user, including the current one
    pub async fn execute_all(&self, user_id: &UserId) -> AuthResult<u64> {
        let deleted = self.session_repo.delete_all_for_user(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            deleted = deleted,
            "User signed out from all sessions"
        );

        Ok(deleted)
    }
}
