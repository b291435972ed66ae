//! Sign Up Use Case
//!
//! Creates a new user account. Does not open a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::profile::UserProfile;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<UserProfile> {
        let name = User::validate_name(input.name.as_deref().unwrap_or_default())?;
        let email = Email::new(input.email.unwrap_or_default())?;
        let raw_password = RawPassword::new(
            input
                .password
                .ok_or(AuthError::MissingField("password"))?,
        )?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let pepper = self.config.pepper().map(<[u8]>::to_vec);
        let password = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw_password, pepper.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        let company = User::normalize_optional("company", input.company)?;
        let phone = User::normalize_optional("phone", input.phone)?;
        let source = User::normalize_optional("source", input.source)?;

        let mut user = User::new(name, email, password)?;
        user.company = company;
        user.phone = phone;
        if let Some(source) = source {
            user.source = source;
        }

        self.user_repo.create_user(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            source = %user.source,
            "User signed up"
        );

        Ok(UserProfile::from(&user))
    }
}
