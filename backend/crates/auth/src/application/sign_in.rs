//! Sign In Use Case
//!
//! Verifies email + password and opens a session.

use std::sync::Arc;

use crate::application::authenticate::AuthenticatedUser;
use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, session_token::SessionToken, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sign in output
pub struct SignInOutput {
    /// Raw session token, for the cookie and the response body
    pub session_token: SessionToken,
    pub user: AuthenticatedUser,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = input
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(AuthError::MissingField("email"))?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::MissingField("password"))?;
        let raw_password = RawPassword::for_login(password)?;

        // A malformed address cannot belong to any account.
        let email = Email::new(&email).map_err(|_| AuthError::UserNotFound)?;

        let user = UserRepository::find_by_email(self.repo.as_ref(), &email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        // Argon2 is CPU-bound; keep it off the async workers.
        let hash = user.password.clone();
        let pepper = self.config.pepper().map(<[u8]>::to_vec);
        let password_valid = tokio::task::spawn_blocking(move || {
            hash.verify(&raw_password, pepper.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let session_token = SessionToken::generate();
        let session = Session::new(user.user_id, session_token.hash(), self.config.session_ttl());

        SessionRepository::create_session(self.repo.as_ref(), &session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user: AuthenticatedUser::from(&user),
        })
    }
}
