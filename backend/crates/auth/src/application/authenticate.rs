//! Authenticate Use Case
//!
//! Resolves a session token to the user it belongs to. Every call goes to
//! the store; nothing is cached.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};
use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};

/// Projection of the user behind a valid session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            company: user.company.clone(),
        }
    }
}

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    repo: Arc<R>,
}

impl<R> AuthenticateUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Resolve a token
    ///
    /// Failure order: no token, unknown token, expired session (the record
    /// is deleted first), missing user.
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<AuthenticatedUser> {
        let token = token
            .filter(|t| !t.is_empty())
            .map(SessionToken::from_client)
            .ok_or(AuthError::Unauthenticated)?;

        let session = SessionRepository::find_by_token_hash(self.repo.as_ref(), &token.hash())
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired_at(Utc::now()) {
            SessionRepository::delete_session(self.repo.as_ref(), &session).await?;
            tracing::info!(
                session_id = %session.session_id,
                user_id = %session.user_id,
                "Expired session removed"
            );
            return Err(AuthError::SessionExpired);
        }

        let user = UserRepository::find_by_id(self.repo.as_ref(), &session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthenticatedUser::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::session::Session;
    use crate::domain::value_object::{
        email::Email,
        user_password::{RawPassword, UserPassword},
    };
    use crate::infra::DocAuthRepository;
    use chrono::Duration;
    use platform::docstore::MemoryDocumentStore;

    type Repo = DocAuthRepository<MemoryDocumentStore>;

    async fn setup() -> (Arc<Repo>, User) {
        let repo = Arc::new(DocAuthRepository::new(Arc::new(MemoryDocumentStore::new())));
        let raw = RawPassword::new("demo123".to_string()).unwrap();
        let mut user = User::new(
            "Demo".to_string(),
            Email::new("demo@lpfacil.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
        .unwrap();
        user.company = Some("LP Facil".to_string());
        repo.create_user(&user).await.unwrap();
        (repo, user)
    }

    async fn issue(repo: &Repo, user_id: UserId, ttl: Duration) -> SessionToken {
        let token = SessionToken::generate();
        repo.create_session(&Session::new(user_id, token.hash(), ttl))
            .await
            .unwrap();
        token
    }

    #[tokio::test]
    async fn test_valid_session() {
        let (repo, user) = setup().await;
        let token = issue(&repo, user.user_id, Duration::hours(24)).await;

        let authenticated = AuthenticateUseCase::new(repo)
            .execute(Some(token.as_str()))
            .await
            .unwrap();

        assert_eq!(authenticated.id, user.user_id);
        assert_eq!(authenticated.email, "demo@lpfacil.com");
        assert_eq!(authenticated.company.as_deref(), Some("LP Facil"));
    }

    #[tokio::test]
    async fn test_missing_token() {
        let (repo, _) = setup().await;
        let use_case = AuthenticateUseCase::new(repo);

        assert!(matches!(use_case.execute(None).await, Err(AuthError::Unauthenticated)));
        assert!(matches!(use_case.execute(Some("")).await, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (repo, _) = setup().await;
        let result = AuthenticateUseCase::new(repo).execute(Some("lps_unknown")).await;
        assert!(matches!(result, Err(AuthError::SessionInvalid)));
    }

    #[tokio::test]
    async fn test_expired_session_is_deleted() {
        let (repo, user) = setup().await;
        let token = issue(&repo, user.user_id, Duration::hours(-1)).await;
        let use_case = AuthenticateUseCase::new(repo.clone());

        let first = use_case.execute(Some(token.as_str())).await;
        assert!(matches!(first, Err(AuthError::SessionExpired)));
        assert!(repo.find_by_token_hash(&token.hash()).await.unwrap().is_none());

        let second = use_case.execute(Some(token.as_str())).await;
        assert!(matches!(second, Err(AuthError::SessionInvalid)));
    }

    #[tokio::test]
    async fn test_session_of_missing_user() {
        let (repo, _) = setup().await;
        let token = issue(&repo, UserId::new(), Duration::hours(1)).await;

        let result = AuthenticateUseCase::new(repo).execute(Some(token.as_str())).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }
}
